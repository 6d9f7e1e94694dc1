//! Incremental channel polling.
//!
//! A `PollerSession` owns the watermark for one channel subscription: the
//! highest message id already handed to the display. Each tick fetches
//! messages after the watermark, advances it, and appends rendered
//! fragments in batch order. Ids at or below the watermark are dropped,
//! which makes at-least-once redelivery from the server harmless.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use crossbeam_channel::Sender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::api::Message;
use crate::error::Result;
use crate::protocol::ClientEvent;
use crate::render::MessageRenderer;

/// Tick interval between polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Where the poller reads messages from.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Fetch messages on `channel_id` with ids greater than `after`,
    /// ascending. `after = 0` returns the initial backlog.
    async fn fetch_after(&self, channel_id: i64, after: i64) -> Result<Vec<Message>>;
}

/// One channel subscription: watermark, timer interval, message source,
/// renderer, and the event sink fragments are appended to.
pub struct PollerSession<S> {
    channel_id: i64,
    watermark: i64,
    interval: Duration,
    source: Arc<S>,
    renderer: Arc<dyn MessageRenderer>,
    events: Sender<ClientEvent>,
}

impl<S: MessageSource + 'static> PollerSession<S> {
    pub fn new(
        channel_id: i64,
        source: Arc<S>,
        renderer: Arc<dyn MessageRenderer>,
        events: Sender<ClientEvent>,
    ) -> Self {
        Self {
            channel_id,
            watermark: 0,
            interval: POLL_INTERVAL,
            source,
            renderer,
            events,
        }
    }

    /// Resume a subscription at a known watermark instead of refetching
    /// the backlog.
    pub fn with_watermark(mut self, watermark: i64) -> Self {
        self.watermark = watermark;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn channel_id(&self) -> i64 {
        self.channel_id
    }

    pub fn watermark(&self) -> i64 {
        self.watermark
    }

    /// One tick: fetch after the watermark and append what is new.
    pub async fn poll_once(&mut self) -> Result<usize> {
        let batch = self
            .source
            .fetch_after(self.channel_id, self.watermark)
            .await?;
        Ok(self.apply_batch(batch))
    }

    /// Id-gate a batch, advancing the watermark and appending fragments
    /// in order. Returns how many messages were fresh.
    fn apply_batch(&mut self, batch: Vec<Message>) -> usize {
        let mut appended = 0;
        for message in batch {
            if message.id <= self.watermark {
                // Stale redelivery
                continue;
            }
            self.watermark = message.id;
            appended += 1;

            let fragment = self.renderer.render(&message);
            if fragment.is_empty() {
                // Still consumed for watermark purposes
                continue;
            }
            // A disconnected receiver means the view is torn down; skip
            // silently rather than erroring
            let _ = self.events.send(ClientEvent::MessageReceived {
                channel_id: self.channel_id,
                message,
                fragment,
            });
        }
        appended
    }

    /// Tick until the owning task is aborted. A failed fetch is logged
    /// and the next tick retries; the watermark is untouched.
    pub async fn run(mut self) {
        let start = Instant::now() + self.interval;
        let mut ticker = interval_at(start, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match self.poll_once().await {
                Ok(0) => {}
                Ok(n) => {
                    tracing::debug!(channel_id = self.channel_id, appended = n, "poll tick");
                }
                Err(e) => {
                    tracing::warn!(channel_id = self.channel_id, error = %e, "poll tick failed");
                }
            }
        }
    }
}

/// Handle to a running poll session's task.
pub struct PollerHandle {
    channel_id: i64,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn channel_id(&self) -> i64 {
        self.channel_id
    }

    /// Cancel the session's timer and any in-flight fetch.
    pub fn stop(self) {
        self.task.abort();
    }
}

/// Live poll sessions, at most one per channel.
#[derive(Default)]
pub struct SessionMap {
    sessions: HashMap<i64, PollerHandle>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a session's run loop, cancelling any prior session for the
    /// same channel first. Must be called from within a tokio runtime.
    pub fn start<S: MessageSource + 'static>(&mut self, session: PollerSession<S>) {
        let channel_id = session.channel_id();
        if let Some(prev) = self.sessions.remove(&channel_id) {
            prev.stop();
        }
        let task = tokio::spawn(session.run());
        self.sessions.insert(channel_id, PollerHandle { channel_id, task });
    }

    /// Stop the session for a channel. Returns false if none was running.
    pub fn stop(&mut self, channel_id: i64) -> bool {
        match self.sessions.remove(&channel_id) {
            Some(handle) => {
                handle.stop();
                true
            }
            None => false,
        }
    }

    pub fn stop_all(&mut self) {
        for (_, handle) in self.sessions.drain() {
            handle.stop();
        }
    }

    pub fn contains(&self, channel_id: i64) -> bool {
        self.sessions.contains_key(&channel_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
