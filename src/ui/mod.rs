// ABOUTME: Plain-text sinks for the host view: the sorted host table and the counter panels
// ABOUTME: Both write to any io::Write so they can target stdout or an in-memory buffer

pub mod host_table;
pub mod summary;

pub use host_table::HostTable;
pub use summary::SummaryPanel;
