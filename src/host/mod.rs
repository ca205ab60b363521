// ABOUTME: Host status records pushed by the monitoring server and their display helpers
// ABOUTME: Decodes the server's snapshot payload and classifies latency readings

pub mod latency;
pub mod record;

pub use latency::{LatencyClass, LatencyThresholds, classify};
pub use record::{HostCounts, HostRecord, HostStatus, decode_snapshot};
