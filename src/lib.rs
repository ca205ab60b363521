// ABOUTME: Live host table engine for the Ping ü monitoring dashboard
// ABOUTME: Keeps server-pushed host snapshots sorted by the user's chosen column and feeds pluggable sinks

pub mod app;
pub mod config;
pub mod feed;
pub mod host;
pub mod reconciler;
pub mod sort;
pub mod ui;

pub use reconciler::{CountsSink, Reconciler, RenderSink};
pub use sort::{SortDirection, SortKey, SortState};
