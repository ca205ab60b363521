// ABOUTME: Sort keys, directions and the comparators used to order the live host table
// ABOUTME: Numeric dotted-quad ordering for addresses and natural alphanumeric ordering for everything else

use crate::host::HostRecord;
use anyhow::anyhow;
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Address,
    DisplayName,
    MacAddress,
    Port,
    Latency,
    Temperature,
    Comment,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::Address,
        SortKey::DisplayName,
        SortKey::MacAddress,
        SortKey::Port,
        SortKey::Latency,
        SortKey::Temperature,
        SortKey::Comment,
    ];

    /// Column id used by the dashboard and the server payload.
    pub fn column_id(self) -> &'static str {
        match self {
            SortKey::Address => "ip",
            SortKey::DisplayName => "nom",
            SortKey::MacAddress => "mac",
            SortKey::Port => "port",
            SortKey::Latency => "latence",
            SortKey::Temperature => "temp",
            SortKey::Comment => "commentaire",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Address => "Address",
            SortKey::DisplayName => "Name",
            SortKey::MacAddress => "MAC",
            SortKey::Port => "Port",
            SortKey::Latency => "Latency",
            SortKey::Temperature => "Temp",
            SortKey::Comment => "Comment",
        }
    }

    fn value_of(self, host: &HostRecord) -> &str {
        let value = match self {
            SortKey::Address => return &host.address,
            SortKey::DisplayName => &host.display_name,
            SortKey::MacAddress => &host.mac_address,
            SortKey::Port => &host.port,
            SortKey::Latency => &host.latency,
            SortKey::Temperature => &host.temperature,
            SortKey::Comment => &host.comment,
        };
        value.as_deref().unwrap_or("")
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ip" | "address" => Ok(SortKey::Address),
            "nom" | "displayName" | "display_name" => Ok(SortKey::DisplayName),
            "mac" | "macAddress" | "mac_address" => Ok(SortKey::MacAddress),
            "port" => Ok(SortKey::Port),
            "latence" | "latency" => Ok(SortKey::Latency),
            "temp" | "temperature" => Ok(SortKey::Temperature),
            "commentaire" | "comment" => Ok(SortKey::Comment),
            other => Err(anyhow!("unknown sort key: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

impl FromStr for SortDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(anyhow!("unknown sort direction: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Same key flips the direction, a new key starts ascending.
    pub fn select(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.toggled();
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }

    pub fn compare(&self, a: &HostRecord, b: &HostRecord) -> Ordering {
        let ordering = match self.key {
            SortKey::Address => compare_addresses(&a.address, &b.address),
            key => natural_cmp(key.value_of(a), key.value_of(b)),
        };
        self.direction.apply(ordering)
    }

    /// Stable in-place sort of `hosts` under this state.
    pub fn sort(&self, hosts: &mut [HostRecord]) {
        hosts.sort_by(|a, b| self.compare(a, b));
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self::new(SortKey::Address, SortDirection::Ascending)
    }
}

/// Sort position of an address. Valid quads order octet by octet; every
/// address that does not parse as four octets falls into one trailing class
/// so the stable sort keeps those rows in their incoming order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AddressKey {
    Quad([u64; 4]),
    Malformed,
}

impl AddressKey {
    pub fn parse(address: &str) -> Self {
        let mut octets = [0u64; 4];
        let mut parts = address.split('.');

        for octet in &mut octets {
            match parts.next().map(parse_octet) {
                Some(Some(value)) => *octet = value,
                _ => return AddressKey::Malformed,
            }
        }

        AddressKey::Quad(octets)
    }
}

/// Octet-by-octet numeric comparison of dotted-quad addresses.
pub fn compare_addresses(a: &str, b: &str) -> Ordering {
    AddressKey::parse(a).cmp(&AddressKey::parse(b))
}

fn parse_octet(octet: &str) -> Option<u64> {
    let octet = octet.trim();
    if octet.is_empty() {
        return Some(0);
    }
    octet.parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Number(&'a str),
    Text(&'a str),
}

/// Splits `s` into maximal runs of ASCII digits and non-digits.
pub fn tokenize(s: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_digits = None;

    for (i, c) in s.char_indices() {
        let is_digit = c.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != is_digit => {
                tokens.push(make_token(&s[start..i], prev));
                start = i;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }

    if let Some(is_digit) = in_digits {
        tokens.push(make_token(&s[start..], is_digit));
    }

    tokens
}

fn make_token(run: &str, is_digit: bool) -> Token<'_> {
    if is_digit {
        Token::Number(run)
    } else {
        Token::Text(run)
    }
}

/// Natural alphanumeric comparison: digit runs compare by value, digit runs
/// sort before text runs in the same slot, and a shorter token sequence
/// sorts first when all shared tokens are equal.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = tokenize(a);
    let right = tokenize(b);

    for (x, y) in left.iter().zip(right.iter()) {
        let ordering = compare_tokens(x, y);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    left.len().cmp(&right.len())
}

fn compare_tokens(a: &Token<'_>, b: &Token<'_>) -> Ordering {
    match (a, b) {
        (Token::Number(x), Token::Number(y)) => compare_digit_runs(x, y),
        (Token::Number(_), Token::Text(_)) => Ordering::Less,
        (Token::Text(_), Token::Number(_)) => Ordering::Greater,
        (Token::Text(x), Token::Text(y)) => compare_text(x, y),
    }
}

// Digit runs can exceed any integer type, so compare them as trimmed strings.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_text(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    // lowercase before uppercase when the folded text is identical
    folded.then_with(|| b.cmp(a))
}
