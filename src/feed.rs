// ABOUTME: Line-delimited JSON event feed carrying host snapshots, sort requests and command acknowledgments
// ABOUTME: Each line decodes to one message for the application loop; bad lines are reported, not fatal

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Snapshot(Value),
    Sort(String),
    Ack {
        success: bool,
        message: Option<String>,
    },
}

pub fn parse_event(line: &str) -> Result<FeedEvent> {
    let value: Value = serde_json::from_str(line).context("Invalid JSON event")?;

    if value.is_array() {
        return Ok(FeedEvent::Snapshot(value));
    }

    let Some(object) = value.as_object() else {
        anyhow::bail!("Unrecognized event: expected an array or an object");
    };

    if let Some(hosts) = object.get("hosts") {
        return Ok(FeedEvent::Snapshot(hosts.clone()));
    }

    if let Some(key) = object.get("sort") {
        let key = key.as_str().context("Sort event key must be a string")?;
        return Ok(FeedEvent::Sort(key.to_string()));
    }

    if let Some(success) = object.get("success") {
        let success = success.as_bool().context("Ack success must be a boolean")?;
        let message = object
            .get("message")
            .or_else(|| object.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string);
        return Ok(FeedEvent::Ack { success, message });
    }

    anyhow::bail!("Unrecognized event: no hosts, sort or success field")
}

/// Reads events line by line, skipping blank lines. Undecodable lines are
/// yielded as errors carrying their line number so the caller can carry on.
pub fn read_events<R: BufRead>(reader: R) -> impl Iterator<Item = Result<FeedEvent>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line_number = index + 1;
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err(anyhow::Error::new(e)
                        .context(format!("Failed to read event line {line_number}"))));
                }
            };
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            Some(parse_event(line).with_context(|| format!("Event line {line_number}")))
        })
}
