// ABOUTME: Core application state and Model-View-Update logic for the live host view
// ABOUTME: Routes feed events into the reconciler and tracks command acknowledgments

use crate::config::Config;
use crate::feed::{FeedEvent, read_events};
use crate::reconciler::{CountsSink, Reconciler, RenderSink};
use anyhow::Result;
use serde_json::Value;
use std::io::BufRead;

pub struct AppState {
    pub config: Config,
    pub reconciler: Reconciler,
    pub refresh_requests: usize,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Message {
    Snapshot(Value),
    Sort(String),
    Ack {
        success: bool,
        message: Option<String>,
    },
    ClearError,
}

impl From<FeedEvent> for Message {
    fn from(event: FeedEvent) -> Self {
        match event {
            FeedEvent::Snapshot(payload) => Message::Snapshot(payload),
            FeedEvent::Sort(key) => Message::Sort(key),
            FeedEvent::Ack { success, message } => Message::Ack { success, message },
        }
    }
}

impl AppState {
    pub fn new(
        config: Config,
        render_sink: Box<dyn RenderSink>,
        counts_sinks: Vec<Box<dyn CountsSink>>,
    ) -> Result<Self> {
        let sort = config.initial_sort()?;
        let mut reconciler =
            Reconciler::new(sort, render_sink).with_flip_on_snapshot(config.view.flip_on_snapshot);
        for sink in counts_sinks {
            reconciler.add_counts_sink(sink);
        }

        Ok(Self {
            config,
            reconciler,
            refresh_requests: 0,
            error_message: None,
        })
    }

    pub fn update(&mut self, message: Message) -> Result<()> {
        match message {
            Message::Snapshot(payload) => {
                self.reconciler.replace_snapshot(&payload)?;
            }

            Message::Sort(key) => {
                if !self.reconciler.request_sort(&key)? {
                    tracing::warn!("Ignoring sort request for unknown column '{key}'");
                }
            }

            Message::Ack { success: true, message } => {
                if let Some(message) = message {
                    tracing::info!("Command acknowledged: {message}");
                }
                // The server only pushes on change, so ask for a fresh snapshot.
                self.refresh_requests += 1;
                self.error_message = None;
            }

            Message::Ack { success: false, message } => {
                let message = message.unwrap_or_else(|| "Command failed".to_string());
                tracing::warn!("Command rejected: {message}");
                self.error_message = Some(message);
            }

            Message::ClearError => {
                self.error_message = None;
            }
        }

        Ok(())
    }

    /// Drives the state from a line-delimited event stream. Undecodable
    /// lines are logged and skipped; sink failures stop the run.
    pub fn run<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        let mut processed = 0;

        for event in read_events(reader) {
            match event {
                Ok(event) => {
                    self.update(event.into())?;
                    processed += 1;
                }
                Err(e) => tracing::warn!("{e:#}"),
            }
        }

        tracing::info!("Processed {processed} events");
        Ok(processed)
    }
}
