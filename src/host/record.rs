// ABOUTME: Host record model and decoding of full host snapshots from the server payload
// ABOUTME: Malformed snapshots degrade to an empty collection instead of raising errors

use serde::Deserialize;
use serde_json::Value;

/// Latency sentinel the server reports for a host that stopped answering.
pub const DOWN_MARKER: &str = "HS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStatus {
    Online,
    Offline,
}

impl HostStatus {
    /// Same rule the server applies when a row carries no explicit status.
    pub fn from_latency(latency: Option<&str>) -> Self {
        match latency {
            Some(l) if l.trim().eq_ignore_ascii_case(DOWN_MARKER) => HostStatus::Offline,
            _ => HostStatus::Online,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HostStatus::Online => "online",
            HostStatus::Offline => "offline",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    pub address: String,
    pub display_name: Option<String>,
    pub mac_address: Option<String>,
    pub port: Option<String>,
    pub latency: Option<String>,
    pub temperature: Option<String>,
    pub status: HostStatus,
    pub site: Option<String>,
    pub comment: Option<String>,
    pub excluded: bool,
}

impl HostRecord {
    pub fn new(address: String, status: HostStatus) -> Self {
        Self {
            address,
            display_name: None,
            mac_address: None,
            port: None,
            latency: None,
            temperature: None,
            status,
            site: None,
            comment: None,
            excluded: false,
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == HostStatus::Online
    }
}

// Row shape emitted by the server in `hosts_update`. Cells are kept as raw
// JSON so a number where text was expected does not cost the whole row.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireHost {
    ip: Option<Value>,
    nom: Option<Value>,
    mac: Option<Value>,
    port: Option<Value>,
    latence: Option<Value>,
    temp: Option<Value>,
    status: Option<Value>,
    site: Option<Value>,
    #[serde(alias = "comm")]
    commentaire: Option<Value>,
    excl: Option<Value>,
}

impl From<WireHost> for HostRecord {
    fn from(wire: WireHost) -> Self {
        let latency = text(wire.latence);
        let status = match text(wire.status).as_deref().map(str::trim) {
            Some("online") => HostStatus::Online,
            Some(s) if !s.is_empty() => HostStatus::Offline,
            _ => HostStatus::from_latency(latency.as_deref()),
        };
        let excluded = match wire.excl {
            Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("x"),
            Some(Value::Bool(b)) => b,
            _ => false,
        };

        Self {
            address: text(wire.ip).unwrap_or_default(),
            display_name: text(wire.nom),
            mac_address: text(wire.mac),
            port: text(wire.port),
            latency,
            temperature: text(wire.temp),
            status,
            site: text(wire.site),
            comment: text(wire.commentaire),
            excluded,
        }
    }
}

/// Scalar cell as display text; blank strings, null, arrays and objects are absent.
fn text(value: Option<Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.trim().is_empty()).then_some(text)
}

/// Decodes a full snapshot. Anything that is not an array is an empty
/// snapshot; elements that are not host objects are dropped.
pub fn decode_snapshot(payload: &Value) -> Vec<HostRecord> {
    let Some(rows) = payload.as_array() else {
        tracing::warn!("Snapshot payload is not an array, treating as empty");
        return Vec::new();
    };

    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| {
            if !row.is_object() {
                tracing::warn!("Skipping snapshot row {index}: not an object");
                return None;
            }
            match WireHost::deserialize(row) {
                Ok(wire) => Some(HostRecord::from(wire)),
                Err(e) => {
                    tracing::warn!("Skipping snapshot row {index}: {e}");
                    None
                }
            }
        })
        .collect()
}

/// Total / online / offline counters for one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostCounts {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
}

impl HostCounts {
    pub fn from_hosts(hosts: &[HostRecord]) -> Self {
        let total = hosts.len();
        let online = hosts.iter().filter(|h| h.is_online()).count();
        Self {
            total,
            online,
            offline: total - online,
        }
    }
}
