//! Debounced autosave of the live document.
//!
//! One background task watches the store. A change arms the timer, and every
//! further change re-arms it. When the timer runs out, the document current at
//! that moment is written. Rapid edits therefore collapse into a single write
//! of the latest value.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::editor::store::DocumentStore;
use crate::models::cv::Document;
use crate::storage::{KvStore, DOCUMENT_KEY};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct Autosaver {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Autosaver {
    /// Starts watching `store`. The document present at spawn time is not
    /// written; only later changes are.
    pub fn spawn(store: &DocumentStore, kv: Arc<dyn KvStore>, debounce: Duration) -> Self {
        let (shutdown, shutdown_rx) = oneshot::channel();
        let changes = store.subscribe();
        let handle = tokio::spawn(run(changes, kv, debounce, shutdown_rx));
        info!("Autosave started (debounce {}ms)", debounce.as_millis());
        Self { shutdown, handle }
    }

    /// Stops the task, flushing a pending change first.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.handle.await {
            warn!("Autosave task ended abnormally: {e}");
        }
        info!("Autosave stopped");
    }
}

async fn run(
    mut changes: watch::Receiver<Arc<Document>>,
    kv: Arc<dyn KvStore>,
    debounce: Duration,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    return;
                }
            }
            _ = &mut shutdown => {
                if changes.has_changed().unwrap_or(false) {
                    let doc = Arc::clone(&changes.borrow_and_update());
                    persist(kv.as_ref(), &doc).await;
                }
                return;
            }
        }

        let mut stop = false;
        loop {
            tokio::select! {
                _ = tokio::time::sleep(debounce) => break,
                changed = changes.changed() => {
                    if changed.is_err() {
                        stop = true;
                        break;
                    }
                    debug!("Autosave re-armed");
                }
                _ = &mut shutdown => {
                    stop = true;
                    break;
                }
            }
        }

        let doc = Arc::clone(&changes.borrow_and_update());
        persist(kv.as_ref(), &doc).await;
        if stop {
            return;
        }
    }
}

/// Best effort: the in-memory document stays authoritative whatever happens here.
async fn persist(kv: &dyn KvStore, doc: &Document) {
    let raw = match serde_json::to_string(doc) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Autosave skipped, document did not serialize: {e}");
            return;
        }
    };
    match kv.set(DOCUMENT_KEY, &raw).await {
        Ok(()) => debug!("Autosaved document ({} bytes)", raw.len()),
        Err(e) => warn!("Autosave failed, keeping in-memory document: {e}"),
    }
}
