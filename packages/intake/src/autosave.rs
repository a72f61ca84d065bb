//! Debounced draft autosave.
//!
//! Every form edit pushes a snapshot here; the draft is only written after
//! the form has been quiet for the debounce window, so rapid typing costs
//! one write instead of one per keystroke.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::draft::{DraftStore, DRAFT_KEY};
use crate::form::IntakeForm;

/// Background writer that debounces form snapshots into the draft slot.
///
/// Dropping the handle aborts the writer, discarding any snapshot still
/// waiting out its quiet period. The wizard relies on this when it clears
/// the draft after submission.
pub struct Autosave {
    tx: mpsc::UnboundedSender<IntakeForm>,
    saved_rx: watch::Receiver<Option<DateTime<Utc>>>,
    task: JoinHandle<()>,
}

impl Autosave {
    /// How long the form must stay untouched before the draft is written.
    pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1000);

    pub fn new(store: Arc<dyn DraftStore>) -> Self {
        Self::with_quiet_period(store, Self::DEFAULT_QUIET_PERIOD)
    }

    pub fn with_quiet_period(store: Arc<dyn DraftStore>, quiet_period: Duration) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<IntakeForm>();
        let (saved_tx, saved_rx) = watch::channel(None);

        let task = tokio::spawn(async move {
            let mut pending: Option<IntakeForm> = None;
            loop {
                tokio::select! {
                    snapshot = rx.recv() => {
                        match snapshot {
                            // Newer snapshot supersedes the pending one and
                            // restarts the quiet period.
                            Some(form) => pending = Some(form),
                            None => break,
                        }
                    }
                    _ = sleep(quiet_period), if pending.is_some() => {
                        if let Some(form) = pending.take() {
                            write_draft(store.as_ref(), &form).await;
                            let _ = saved_tx.send(Some(Utc::now()));
                        }
                    }
                }
            }
        });

        Self { tx, saved_rx, task }
    }

    /// Queues a form snapshot for saving.
    pub fn push(&self, form: IntakeForm) {
        let _ = self.tx.send(form);
    }

    /// When the draft was last written, if ever.
    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        *self.saved_rx.borrow()
    }

    /// Waits until the next draft write completes.
    pub async fn saved(&mut self) {
        let _ = self.saved_rx.changed().await;
    }
}

impl Drop for Autosave {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn write_draft(store: &dyn DraftStore, form: &IntakeForm) {
    let raw = match serde_json::to_string(form) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Could not serialize intake draft: {}", e);
            return;
        }
    };
    match store.set(DRAFT_KEY, &raw).await {
        Ok(()) => debug!("Intake draft saved"),
        Err(e) => warn!("Could not save intake draft: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{DraftResult, MemoryDraftStore};
    use crate::form::IntakeInput;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts writes so tests can assert debouncing.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryDraftStore,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl DraftStore for CountingStore {
        async fn get(&self, key: &str) -> DraftResult<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> DraftResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value).await
        }

        async fn delete(&self, key: &str) -> DraftResult<()> {
            self.inner.delete(key).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_edits_costs_one_write() {
        let store = Arc::new(CountingStore::default());
        let mut autosave = Autosave::new(store.clone());

        let mut form = IntakeForm::default();
        for title in ["A", "AI", "AI S", "AI Shop"] {
            form.set(IntakeInput::ProjectTitle(title.to_string()));
            autosave.push(form.clone());
        }

        autosave.saved().await;
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);

        let raw = store.get(DRAFT_KEY).await.unwrap().unwrap();
        let saved: IntakeForm = serde_json::from_str(&raw).unwrap();
        assert_eq!(saved.project_title, "AI Shop");
    }

    #[tokio::test(start_paused = true)]
    async fn quiet_periods_produce_separate_writes() {
        let store = Arc::new(CountingStore::default());
        let mut autosave = Autosave::new(store.clone());

        let mut form = IntakeForm::default();
        form.set(IntakeInput::BusinessName("Acme".to_string()));
        autosave.push(form.clone());
        autosave.saved().await;

        form.set(IntakeInput::BusinessName("Acme Corp".to_string()));
        autosave.push(form.clone());
        autosave.saved().await;

        assert_eq!(store.writes.load(Ordering::SeqCst), 2);
        assert!(autosave.last_saved_at().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_discards_the_pending_snapshot() {
        let store = Arc::new(CountingStore::default());
        let autosave = Autosave::new(store.clone());

        let mut form = IntakeForm::default();
        form.set(IntakeInput::ProjectTitle("Shop".to_string()));
        autosave.push(form);
        drop(autosave);

        // Let any stray task run; nothing should be written.
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
        assert!(store.get(DRAFT_KEY).await.unwrap().is_none());
    }
}
