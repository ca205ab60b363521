// ABOUTME: Latency severity classes used to colour-code the latency column
// ABOUTME: Parses the leading number out of a formatted latency string and buckets it by threshold

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyClass {
    Excellent,
    Good,
    Warning,
    Critical,
    Offline,
}

impl LatencyClass {
    pub fn label(self) -> &'static str {
        match self {
            LatencyClass::Excellent => "excellent",
            LatencyClass::Good => "good",
            LatencyClass::Warning => "warning",
            LatencyClass::Critical => "critical",
            LatencyClass::Offline => "offline",
        }
    }
}

/// Upper bounds in milliseconds, exclusive.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct LatencyThresholds {
    pub excellent_below_ms: f64,
    pub good_below_ms: f64,
    pub warning_below_ms: f64,
}

impl Default for LatencyThresholds {
    fn default() -> Self {
        Self {
            excellent_below_ms: 20.0,
            good_below_ms: 50.0,
            warning_below_ms: 100.0,
        }
    }
}

pub fn classify(latency: Option<&str>, thresholds: &LatencyThresholds) -> LatencyClass {
    let latency = match latency.map(str::trim) {
        None | Some("") | Some("-") => return LatencyClass::Offline,
        Some(l) => l.to_lowercase(),
    };

    if latency.contains("hs") {
        return LatencyClass::Offline;
    }

    let Some(run) = numeric_run(&latency) else {
        return LatencyClass::Good;
    };
    // A run with no digits before its second dot ("." or "..5") reads as NaN,
    // which fails every bound below and lands in Critical.
    let ms = leading_number(run).unwrap_or(f64::NAN);

    if ms < thresholds.excellent_below_ms {
        LatencyClass::Excellent
    } else if ms < thresholds.good_below_ms {
        LatencyClass::Good
    } else if ms < thresholds.warning_below_ms {
        LatencyClass::Warning
    } else {
        LatencyClass::Critical
    }
}

// First run of digits and dots.
fn numeric_run(s: &str) -> Option<&str> {
    let start = s.find(|c: char| c.is_ascii_digit() || c == '.')?;
    s[start..]
        .split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .next()
}

// Longest float prefix of a digit/dot run ("1.2.3" reads as 1.2).
fn leading_number(run: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in run.char_indices() {
        if c == '.' {
            if seen_dot {
                break;
            }
            seen_dot = true;
        }
        end = i + 1;
    }

    let number = run[..end].trim_end_matches('.');
    if number.is_empty() {
        return None;
    }
    number.parse().ok()
}
