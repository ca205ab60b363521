// ABOUTME: Live host view reconciler owning the current snapshot and the active sort state
// ABOUTME: Re-sorts on every push or sort request and feeds the render and counter sinks

use crate::host::{HostCounts, HostRecord, decode_snapshot};
use crate::sort::{SortKey, SortState};
use anyhow::Result;
use serde_json::Value;

/// Receives the ordered host list after every snapshot or sort request.
pub trait RenderSink {
    fn render(&mut self, hosts: &[HostRecord], sort: SortState) -> Result<()>;
}

/// Receives the aggregate counters after every snapshot.
pub trait CountsSink {
    fn show_counts(&mut self, counts: HostCounts) -> Result<()>;
}

pub struct Reconciler {
    hosts: Vec<HostRecord>,
    sort: SortState,
    flip_on_snapshot: bool,
    render_sink: Box<dyn RenderSink>,
    counts_sinks: Vec<Box<dyn CountsSink>>,
}

impl Reconciler {
    pub fn new(sort: SortState, render_sink: Box<dyn RenderSink>) -> Self {
        Self {
            hosts: Vec::new(),
            sort,
            flip_on_snapshot: true,
            render_sink,
            counts_sinks: Vec::new(),
        }
    }

    /// When disabled, a push re-applies the current sort state unchanged
    /// instead of inverting the direction first.
    pub fn with_flip_on_snapshot(mut self, flip: bool) -> Self {
        self.flip_on_snapshot = flip;
        self
    }

    pub fn add_counts_sink(&mut self, sink: Box<dyn CountsSink>) {
        self.counts_sinks.push(sink);
    }

    /// Replaces the whole collection with a server push.
    pub fn replace_snapshot(&mut self, payload: &Value) -> Result<()> {
        self.replace_hosts(decode_snapshot(payload))
    }

    pub fn replace_hosts(&mut self, hosts: Vec<HostRecord>) -> Result<()> {
        self.hosts = hosts;

        if self.flip_on_snapshot {
            self.sort.direction = self.sort.direction.toggled();
        }
        tracing::debug!(
            "Snapshot of {} hosts, sorting by {:?} {:?}",
            self.hosts.len(),
            self.sort.key,
            self.sort.direction
        );

        self.sort.sort(&mut self.hosts);
        self.render_sink.render(&self.hosts, self.sort)?;

        let counts = HostCounts::from_hosts(&self.hosts);
        for sink in &mut self.counts_sinks {
            sink.show_counts(counts)?;
        }

        Ok(())
    }

    /// Applies a user sort request. Returns `false` for an unrecognized key,
    /// in which case nothing changes and nothing is rendered.
    pub fn request_sort(&mut self, key: &str) -> Result<bool> {
        let key = match key.parse::<SortKey>() {
            Ok(key) => key,
            Err(e) => {
                tracing::debug!("Ignoring sort request: {e}");
                return Ok(false);
            }
        };

        self.sort.select(key);
        tracing::debug!("Sorting by {:?} {:?}", self.sort.key, self.sort.direction);

        self.sort.sort(&mut self.hosts);
        self.render_sink.render(&self.hosts, self.sort)?;
        Ok(true)
    }

    pub fn hosts(&self) -> &[HostRecord] {
        &self.hosts
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn counts(&self) -> HostCounts {
        HostCounts::from_hosts(&self.hosts)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::host::HostStatus;
    use crate::sort::SortDirection;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    pub struct Recorded {
        pub renders: Vec<(Vec<String>, SortState)>,
        pub counts: Vec<(&'static str, HostCounts)>,
    }

    pub struct RecordingSink {
        pub name: &'static str,
        pub log: Rc<RefCell<Recorded>>,
    }

    impl RenderSink for RecordingSink {
        fn render(&mut self, hosts: &[HostRecord], sort: SortState) -> Result<()> {
            let addresses = hosts.iter().map(|h| h.address.clone()).collect();
            self.log.borrow_mut().renders.push((addresses, sort));
            Ok(())
        }
    }

    impl CountsSink for RecordingSink {
        fn show_counts(&mut self, counts: HostCounts) -> Result<()> {
            self.log.borrow_mut().counts.push((self.name, counts));
            Ok(())
        }
    }

    struct FailingSink;

    impl RenderSink for FailingSink {
        fn render(&mut self, _hosts: &[HostRecord], _sort: SortState) -> Result<()> {
            anyhow::bail!("render surface gone")
        }
    }

    fn reconciler() -> (Reconciler, Rc<RefCell<Recorded>>) {
        let log = Rc::new(RefCell::new(Recorded::default()));
        let sink = RecordingSink { name: "table", log: log.clone() };
        let mut reconciler = Reconciler::new(SortState::default(), Box::new(sink));
        reconciler.add_counts_sink(Box::new(RecordingSink { name: "summary", log: log.clone() }));
        reconciler.add_counts_sink(Box::new(RecordingSink { name: "dashboard", log: log.clone() }));
        (reconciler, log)
    }

    fn record(address: &str, latency: &str, temperature: &str) -> HostRecord {
        let mut host = HostRecord::new(address.to_string(), HostStatus::Online);
        host.latency = Some(latency.to_string());
        host.temperature = Some(temperature.to_string());
        host
    }

    fn addresses(reconciler: &Reconciler) -> Vec<&str> {
        reconciler.hosts().iter().map(|h| h.address.as_str()).collect()
    }

    #[test]
    fn test_initial_state() {
        let (reconciler, log) = reconciler();
        assert_eq!(
            reconciler.sort_state(),
            SortState::new(SortKey::Address, SortDirection::Ascending)
        );
        assert!(reconciler.hosts().is_empty());
        assert!(log.borrow().renders.is_empty());
    }

    #[test]
    fn test_snapshot_flips_direction_and_renders_once() {
        let (mut reconciler, log) = reconciler();
        let payload = json!([{ "ip": "10.0.0.10" }, { "ip": "10.0.0.2" }, { "ip": "10.0.0.9" }]);

        reconciler.replace_snapshot(&payload).unwrap();

        assert_eq!(
            reconciler.sort_state(),
            SortState::new(SortKey::Address, SortDirection::Descending)
        );
        assert_eq!(addresses(&reconciler), vec!["10.0.0.10", "10.0.0.9", "10.0.0.2"]);

        let log = log.borrow();
        assert_eq!(log.renders.len(), 1);
        assert_eq!(log.renders[0].0, vec!["10.0.0.10", "10.0.0.9", "10.0.0.2"]);
        assert_eq!(log.renders[0].1.direction, SortDirection::Descending);
    }

    #[test]
    fn test_snapshot_without_flip_keeps_direction() {
        let (reconciler, _log) = reconciler();
        let mut reconciler = reconciler.with_flip_on_snapshot(false);
        let payload = json!([{ "ip": "10.0.0.10" }, { "ip": "10.0.0.2" }]);

        reconciler.replace_snapshot(&payload).unwrap();
        reconciler.replace_snapshot(&payload).unwrap();

        assert_eq!(reconciler.sort_state().direction, SortDirection::Ascending);
        assert_eq!(addresses(&reconciler), vec!["10.0.0.2", "10.0.0.10"]);
    }

    #[test]
    fn test_successive_snapshots_alternate_direction() {
        let (mut reconciler, _log) = reconciler();
        let payload = json!([{ "ip": "10.0.0.1" }, { "ip": "10.0.0.3" }]);

        reconciler.replace_snapshot(&payload).unwrap();
        assert_eq!(reconciler.sort_state().direction, SortDirection::Descending);
        reconciler.replace_snapshot(&payload).unwrap();
        assert_eq!(reconciler.sort_state().direction, SortDirection::Ascending);
        assert_eq!(addresses(&reconciler), vec!["10.0.0.1", "10.0.0.3"]);
    }

    #[test]
    fn test_counts_reach_every_sink() {
        let (mut reconciler, log) = reconciler();
        let payload = json!([
            { "ip": "10.0.0.1", "status": "online" },
            { "ip": "10.0.0.2", "status": "offline" },
            { "ip": "10.0.0.3", "status": "online" },
            { "ip": "10.0.0.4", "latence": "HS" },
            { "ip": "10.0.0.5", "latence": "2 ms" }
        ]);

        reconciler.replace_snapshot(&payload).unwrap();

        let expected = HostCounts { total: 5, online: 3, offline: 2 };
        let log = log.borrow();
        assert_eq!(log.counts, vec![("summary", expected), ("dashboard", expected)]);
        assert_eq!(reconciler.counts(), expected);
    }

    #[test]
    fn test_empty_snapshots_are_idempotent() {
        let (mut reconciler, log) = reconciler();

        reconciler.replace_snapshot(&json!([])).unwrap();
        reconciler.replace_snapshot(&json!([])).unwrap();

        let log = log.borrow();
        assert_eq!(log.renders.len(), 2);
        assert!(log.renders.iter().all(|(hosts, _)| hosts.is_empty()));
        assert!(log.counts.iter().all(|(_, c)| *c == HostCounts::default()));
        assert_eq!(log.counts.len(), 4);
    }

    #[test]
    fn test_malformed_snapshot_renders_empty() {
        let (mut reconciler, log) = reconciler();
        reconciler.replace_snapshot(&json!([{ "ip": "10.0.0.1" }])).unwrap();

        reconciler.replace_snapshot(&json!({ "error": "boom" })).unwrap();

        assert!(reconciler.hosts().is_empty());
        assert_eq!(log.borrow().counts.last().unwrap().1, HostCounts::default());
    }

    #[test]
    fn test_duplicate_addresses_are_not_merged() {
        let (mut reconciler, log) = reconciler();
        let payload = json!([{ "ip": "10.0.0.1" }, { "ip": "10.0.0.2" }, { "ip": "10.0.0.1" }]);

        reconciler.replace_snapshot(&payload).unwrap();

        assert_eq!(reconciler.hosts().len(), 3);
        assert_eq!(log.borrow().renders[0].0.len(), 3);
    }

    #[test]
    fn test_large_snapshot_with_odd_rows_keeps_every_host() {
        let (mut reconciler, log) = reconciler();
        let rows: Vec<Value> = (0..60)
            .map(|i| match i % 4 {
                0 => json!({ "ip": format!("10.0.x.{i}"), "latence": i }),
                1 => json!({ "ip": format!("10.0.0.{i}"), "latence": "HS" }),
                _ => json!({ "ip": format!("10.0.{i}.1"), "nom": i }),
            })
            .collect();

        reconciler.replace_snapshot(&Value::Array(rows)).unwrap();

        assert_eq!(reconciler.hosts().len(), 60);
        assert_eq!(log.borrow().renders[0].0.len(), 60);
        assert_eq!(reconciler.counts(), HostCounts { total: 60, online: 45, offline: 15 });
        assert!(addresses(&reconciler)[..15].iter().all(|a| a.contains(".x.")));

        assert!(reconciler.request_sort("ip").unwrap());
        assert_eq!(reconciler.sort_state().direction, SortDirection::Ascending);
        assert!(addresses(&reconciler)[45..].iter().all(|a| a.contains(".x.")));
        assert_eq!(addresses(&reconciler)[0], "10.0.0.1");
    }

    #[test]
    fn test_request_sort_toggles_on_same_key() {
        let (mut reconciler, log) = reconciler();
        reconciler
            .replace_hosts(vec![
                record("10.0.0.1", "120 ms", "40"),
                record("10.0.0.2", "8 ms", "35"),
                record("10.0.0.3", "15 ms", "50"),
            ])
            .unwrap();

        assert!(reconciler.request_sort("latency").unwrap());
        assert_eq!(
            reconciler.sort_state(),
            SortState::new(SortKey::Latency, SortDirection::Ascending)
        );
        assert_eq!(addresses(&reconciler), vec!["10.0.0.2", "10.0.0.3", "10.0.0.1"]);

        assert!(reconciler.request_sort("latency").unwrap());
        assert_eq!(reconciler.sort_state().direction, SortDirection::Descending);
        assert_eq!(addresses(&reconciler), vec!["10.0.0.1", "10.0.0.3", "10.0.0.2"]);

        assert_eq!(log.borrow().renders.len(), 3);
    }

    #[test]
    fn test_request_sort_resets_on_key_change() {
        let (mut reconciler, _log) = reconciler();
        reconciler
            .replace_hosts(vec![
                record("10.0.0.1", "120 ms", "40"),
                record("10.0.0.2", "8 ms", "35"),
            ])
            .unwrap();

        reconciler.request_sort("latency").unwrap();
        reconciler.request_sort("latency").unwrap();
        reconciler.request_sort("temperature").unwrap();

        assert_eq!(
            reconciler.sort_state(),
            SortState::new(SortKey::Temperature, SortDirection::Ascending)
        );
        assert_eq!(addresses(&reconciler), vec!["10.0.0.2", "10.0.0.1"]);
    }

    #[test]
    fn test_unknown_sort_key_is_noop() {
        let (mut reconciler, log) = reconciler();
        reconciler.replace_hosts(vec![record("10.0.0.1", "1 ms", "1")]).unwrap();
        let before = reconciler.sort_state();

        assert!(!reconciler.request_sort("status").unwrap());

        assert_eq!(reconciler.sort_state(), before);
        assert_eq!(log.borrow().renders.len(), 1);
    }

    #[test]
    fn test_ties_keep_snapshot_order_across_sorts() {
        let (mut reconciler, _log) = reconciler();
        reconciler
            .replace_hosts(vec![
                record("10.0.0.7", "5 ms", "30"),
                record("10.0.0.3", "9 ms", "30"),
                record("10.0.0.5", "1 ms", "30"),
            ])
            .unwrap();
        let order = addresses(&reconciler).iter().map(|s| s.to_string()).collect::<Vec<_>>();

        reconciler.request_sort("temp").unwrap();
        assert_eq!(addresses(&reconciler), order);
        reconciler.request_sort("temp").unwrap();
        assert_eq!(addresses(&reconciler), order);
    }

    #[test]
    fn test_render_failure_propagates() {
        let mut reconciler = Reconciler::new(SortState::default(), Box::new(FailingSink));
        let result = reconciler.replace_snapshot(&json!([]));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("render surface gone"));
    }
}
