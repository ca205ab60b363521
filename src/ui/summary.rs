// ABOUTME: Counter panel printing total, online and offline host counts
// ABOUTME: Several panels can be registered on one reconciler and all receive the same counts

use crate::host::HostCounts;
use crate::reconciler::CountsSink;
use anyhow::{Context, Result};
use std::io::Write;

pub struct SummaryPanel<W: Write> {
    label: String,
    out: W,
}

impl<W: Write> SummaryPanel<W> {
    pub fn new(label: impl Into<String>, out: W) -> Self {
        Self {
            label: label.into(),
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CountsSink for SummaryPanel<W> {
    fn show_counts(&mut self, counts: HostCounts) -> Result<()> {
        writeln!(
            self.out,
            "{}: total={} online={} offline={}",
            self.label, counts.total, counts.online, counts.offline
        )
        .with_context(|| format!("Failed to write {} panel", self.label))
    }
}
