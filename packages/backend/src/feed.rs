//! Change-feed contract for row-level insert notifications.
//!
//! Consumers never act on the payload body: a matching event only means
//! "something changed, re-fetch". That keeps the refresh logic independent
//! of whichever transport actually delivers the notification. The provided
//! [`ChannelChangeFeed`] is an in-process hub; a realtime transport adapter
//! (the hosted backend's own delivery mechanism, out of scope here) would
//! publish into it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::warn;

use crate::error::BackendResult;

const FEED_CAPACITY: usize = 256;

/// Row-level event kinds a subscription can match on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    Insert,
}

/// A change notification for one row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: String,
    pub event: EventKind,
    /// Equality-filter column: the project the changed row belongs to.
    pub project_id: String,
    /// Raw row payload, if the transport delivered one. Consumers re-fetch
    /// regardless, so this may be `None`.
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

impl ChangeEvent {
    pub fn insert(table: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            event: EventKind::Insert,
            project_id: project_id.into(),
            payload: None,
        }
    }
}

/// Source of change notifications, filterable by table and project.
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Opens one subscription for insert events on `table` scoped to
    /// `project_id`. Each mounted view holds exactly one subscription and
    /// drops it on unmount.
    async fn subscribe(&self, table: &str, project_id: &str) -> BackendResult<FeedSubscription>;
}

/// A live subscription delivering matching [`ChangeEvent`]s.
pub struct FeedSubscription {
    rx: broadcast::Receiver<ChangeEvent>,
    table: String,
    project_id: String,
}

impl FeedSubscription {
    /// Waits for the next matching event. Returns `None` once the feed is
    /// closed.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => {
                    if event.event == EventKind::Insert
                        && event.table == self.table
                        && event.project_id == self.project_id
                    {
                        return Some(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Missing an event only delays convergence until the
                    // next insert; every notification triggers the same
                    // full re-fetch.
                    warn!(skipped, "change feed receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// In-process change-feed hub over a broadcast channel.
#[derive(Clone)]
pub struct ChannelChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChannelChangeFeed {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(FEED_CAPACITY);
        Self { tx }
    }

    /// Publishes an event to all live subscriptions. Events published while
    /// nobody is subscribed are dropped.
    pub fn publish(&self, event: ChangeEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for ChannelChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChangeFeed for ChannelChangeFeed {
    async fn subscribe(&self, table: &str, project_id: &str) -> BackendResult<FeedSubscription> {
        Ok(FeedSubscription {
            rx: self.tx.subscribe(),
            table: table.to_string(),
            project_id: project_id.to_string(),
        })
    }
}
