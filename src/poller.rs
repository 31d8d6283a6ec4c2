// Status poller
// Fetches workflow status on a fixed cadence and applies it to the view

use crate::state::ViewState;
use async_trait::async_trait;
use marketgap_backend::status::WorkflowStatusSnapshot;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Errors raised while talking to the backend
#[derive(Error, Debug)]
pub enum PollError {
    /// The request could not be sent or the body not read
    #[error("Backend request failed: {0}")]
    Http(String),

    /// The backend answered with the failure envelope
    #[error("Backend returned {status}: {message}")]
    Backend {
        /// HTTP status code
        status: u16,
        /// Error message from the envelope
        message: String,
    },

    /// The body was not the expected envelope
    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for PollError {
    fn from(err: reqwest::Error) -> Self {
        PollError::Http(err.to_string())
    }
}

/// Where status snapshots come from
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch one snapshot
    async fn fetch_status(&self) -> Result<WorkflowStatusSnapshot, PollError>;
}

/// Polls a [`StatusSource`] until stopped.
///
/// Ticks never overlap: each fetch is awaited before the next tick, and
/// ticks missed during a slow fetch are skipped rather than bunched up.
pub struct StatusPoller {
    source: Arc<dyn StatusSource>,
    view: Arc<Mutex<ViewState>>,
    interval: Duration,
    max_ticks: Option<u64>,
    stop_tx: watch::Sender<bool>,
    updates_tx: Arc<watch::Sender<u64>>,
}

impl StatusPoller {
    /// Create a poller writing into `view`
    pub fn new(source: Arc<dyn StatusSource>, view: Arc<Mutex<ViewState>>, interval: Duration) -> Self {
        let (stop_tx, _) = watch::channel(false);
        let (updates_tx, _) = watch::channel(0);
        Self {
            source,
            view,
            interval,
            max_ticks: None,
            stop_tx,
            updates_tx: Arc::new(updates_tx),
        }
    }

    /// Stop on its own after `ticks` polls
    pub fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }

    /// Receives the sequence number of every applied poll
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.updates_tx.subscribe()
    }

    /// Start polling in a background task
    pub fn start(&self) -> JoinHandle<()> {
        let source = Arc::clone(&self.source);
        let view = Arc::clone(&self.view);
        let interval = self.interval;
        let max_ticks = self.max_ticks;
        let mut stop_rx = self.stop_tx.subscribe();
        let updates_tx = Arc::clone(&self.updates_tx);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut seq: u64 = 0;

            loop {
                if *stop_rx.borrow() {
                    break;
                }
                if max_ticks.map(|max| seq >= max).unwrap_or(false) {
                    tracing::debug!(ticks = seq, "Tick limit reached");
                    break;
                }

                tokio::select! {
                    _ = stop_rx.changed() => break,
                    _ = ticker.tick() => {}
                }

                seq += 1;
                let result = tokio::select! {
                    _ = stop_rx.changed() => break,
                    result = source.fetch_status() => result,
                };

                if let Err(e) = &result {
                    tracing::warn!(seq = seq, "Status poll failed: {}", e);
                }

                let applied = view.lock().await.apply(seq, result);
                if applied {
                    updates_tx.send_replace(seq);
                }
            }

            tracing::debug!("Status poller stopped");
        })
    }

    /// Stop polling. The view is frozen immediately, so a fetch that is still
    /// in flight can no longer change it.
    pub async fn stop(&self) {
        self.view.lock().await.stop();
        self.stop_tx.send_replace(true);
    }
}
