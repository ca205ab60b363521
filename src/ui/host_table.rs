// ABOUTME: Host table renderer that prints the sorted hosts with a direction arrow on the active column
// ABOUTME: Implements the reconciler's render sink on top of any writer

use crate::host::{HostRecord, LatencyThresholds, classify};
use crate::reconciler::RenderSink;
use crate::sort::{SortKey, SortState};
use anyhow::{Context, Result};
use std::io::Write;

const UNSORTED: &str = "↕";
const EMPTY_CELL: &str = "-";

pub struct HostTable<W: Write> {
    out: W,
    thresholds: LatencyThresholds,
}

impl<W: Write> HostTable<W> {
    pub fn new(out: W, thresholds: LatencyThresholds) -> Self {
        Self { out, thresholds }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn header(sort: SortState) -> Vec<String> {
        let mut columns: Vec<String> = SortKey::ALL
            .iter()
            .map(|&key| {
                let arrow = if key == sort.key {
                    sort.direction.indicator()
                } else {
                    UNSORTED
                };
                format!("{} {}", key.label(), arrow)
            })
            .collect();
        // Status, site and exclusion are displayed but not sortable.
        columns.insert(6, "Status".to_string());
        columns.insert(7, "Site".to_string());
        columns.push("Excl".to_string());
        columns
    }

    fn row(&self, host: &HostRecord) -> Vec<String> {
        let cell = |value: &Option<String>| value.clone().unwrap_or_else(|| EMPTY_CELL.to_string());
        let latency_class = classify(host.latency.as_deref(), &self.thresholds);

        vec![
            host.address.clone(),
            cell(&host.display_name),
            cell(&host.mac_address),
            cell(&host.port),
            format!("{} [{}]", cell(&host.latency), latency_class.label()),
            cell(&host.temperature),
            host.status.label().to_string(),
            cell(&host.site),
            cell(&host.comment),
            if host.excluded { "x" } else { "" }.to_string(),
        ]
    }
}

impl<W: Write> RenderSink for HostTable<W> {
    fn render(&mut self, hosts: &[HostRecord], sort: SortState) -> Result<()> {
        let header = Self::header(sort);

        if hosts.is_empty() {
            writeln!(self.out, "{}", header.join(" | "))
                .and_then(|_| writeln!(self.out, "No hosts configured"))
                .context("Failed to write host table")?;
            return self.out.flush().context("Failed to flush host table");
        }

        let rows: Vec<Vec<String>> = hosts.iter().map(|h| self.row(h)).collect();

        let mut widths: Vec<usize> = header.iter().map(|c| c.chars().count()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| pad(cell, width))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let mut text = line(header.as_slice());
        text.push('\n');
        for row in &rows {
            text.push_str(&line(row.as_slice()));
            text.push('\n');
        }

        self.out
            .write_all(text.as_bytes())
            .context("Failed to write host table")?;
        self.out.flush().context("Failed to flush host table")
    }
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    format!("{cell}{}", " ".repeat(fill))
}
