//! Live discussion thread for one service request.
//!
//! The thread holds a snapshot of the conversation joined with author
//! profiles. Change-feed events never carry trusted data; every matching
//! event triggers a full re-fetch, so the snapshot always converges on
//! what the backend holds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use mindtoweb_backend::{Backend, BackendError, ChangeFeed, DISCUSSIONS_TABLE};
use mindtoweb_core::{DiscussionComment, NewComment, Profile};

/// Discussion failures surfaced to the rendering layer.
#[derive(Debug, Error)]
pub enum DiscussionError {
    #[error("Comment cannot be empty")]
    EmptyComment,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// A comment joined with its author's profile.
#[derive(Debug, Clone)]
pub struct ThreadComment {
    pub comment: DiscussionComment,
    /// Absent when the author has no profile row; rendering falls back to a
    /// generic name rather than failing the whole thread.
    pub author: Option<Profile>,
    pub is_from_viewer: bool,
}

impl ThreadComment {
    pub fn author_name(&self) -> &str {
        match &self.author {
            Some(profile) if !profile.full_name.is_empty() => &profile.full_name,
            _ => "User",
        }
    }
}

/// The discussion thread attached to one service request.
///
/// Cheap to clone; clones share the same snapshot, so the sync task and the
/// rendering layer observe the same state.
#[derive(Clone)]
pub struct DiscussionThread {
    project_id: String,
    viewer_id: String,
    backend: Arc<dyn Backend>,
    state: Arc<RwLock<Vec<ThreadComment>>>,
}

impl DiscussionThread {
    pub fn new(
        backend: Arc<dyn Backend>,
        project_id: impl Into<String>,
        viewer_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            viewer_id: viewer_id.into(),
            backend,
            state: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Current snapshot, oldest comment first.
    pub fn comments(&self) -> Vec<ThreadComment> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Re-fetches the conversation and author profiles from the backend.
    ///
    /// The snapshot is only replaced when both fetches succeed; a failed
    /// refresh leaves the previous snapshot visible.
    pub async fn load(&self) -> Result<(), DiscussionError> {
        let joined = self.fetch().await?;
        self.commit(joined);
        Ok(())
    }

    async fn fetch(&self) -> Result<Vec<ThreadComment>, DiscussionError> {
        let comments = self.backend.list_comments(&self.project_id).await?;

        let mut author_ids: Vec<String> = comments.iter().map(|c| c.user_id.clone()).collect();
        author_ids.sort();
        author_ids.dedup();

        let profiles = if author_ids.is_empty() {
            Vec::new()
        } else {
            self.backend.get_profiles(&author_ids).await?
        };

        let mut joined: Vec<ThreadComment> = comments
            .into_iter()
            .map(|comment| {
                let author = profiles.iter().find(|p| p.id == comment.user_id).cloned();
                let is_from_viewer = comment.user_id == self.viewer_id;
                ThreadComment {
                    comment,
                    author,
                    is_from_viewer,
                }
            })
            .collect();
        joined.sort_by(|a, b| a.comment.created_at.cmp(&b.comment.created_at));
        Ok(joined)
    }

    fn commit(&self, joined: Vec<ThreadComment>) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = joined;
    }

    /// Posts a comment as the viewer. Content is sent exactly as typed;
    /// only comments that are empty after trimming are refused, locally,
    /// without a backend round trip.
    pub async fn post(&self, content: &str) -> Result<(), DiscussionError> {
        if content.trim().is_empty() {
            return Err(DiscussionError::EmptyComment);
        }

        self.backend
            .insert_comment(&NewComment {
                project_id: self.project_id.clone(),
                user_id: self.viewer_id.clone(),
                content: content.to_string(),
            })
            .await?;

        // The insert is already durable; a failed refresh here only delays
        // the snapshot until the next feed event.
        if let Err(e) = self.load().await {
            warn!("Posted comment but could not refresh thread: {}", e);
        }
        Ok(())
    }

    /// Subscribes to the change feed and keeps the snapshot current until
    /// the returned handle is dropped.
    pub async fn spawn_sync(&self, feed: &dyn ChangeFeed) -> Result<SyncHandle, DiscussionError> {
        let mut subscription = feed.subscribe(DISCUSSIONS_TABLE, &self.project_id).await?;
        let thread = self.clone();
        let active = Arc::new(AtomicBool::new(true));
        let alive = active.clone();

        let task = tokio::spawn(async move {
            while subscription.next().await.is_some() {
                debug!(project_id = %thread.project_id, "discussion changed, re-fetching");
                match thread.fetch().await {
                    // The handle may have been dropped while the fetch was
                    // in flight; a disposed view never sees the result.
                    Ok(joined) if alive.load(Ordering::Acquire) => thread.commit(joined),
                    Ok(_) => break,
                    Err(e) => warn!("Discussion refresh failed: {}", e),
                }
            }
        });

        Ok(SyncHandle { task, active })
    }
}

/// Keeps the thread's feed subscription alive; dropping it stops updates,
/// the way unmounting the view does.
pub struct SyncHandle {
    task: JoinHandle<()>,
    active: Arc<AtomicBool>,
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
        self.task.abort();
    }
}
