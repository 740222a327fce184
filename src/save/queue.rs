//! Auto-Save Queue Module
//!
//! Debounced, priority-ordered write coalescing for one logical save
//! target (an in-progress grading form).

use std::sync::{Arc, Mutex as StdMutex};

use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::current_timestamp_ms;
use crate::error::SaveResult;
use crate::models::OwnerContext;
use crate::persist::{StoredRecord, TieredPersistence};
use crate::save::{deep_merge, QueuedWrite, SavePriority, SaveStatus};

/// Callback invoked after every completed flush attempt.
pub type SavedCallback = Box<dyn Fn(&SaveStatus) + Send + Sync>;
/// Callback invoked when the fast path rejects a flush.
pub type ErrorCallback = Box<dyn Fn(&crate::error::SaveError) + Send + Sync>;

// == Queue State ==
/// Mutable state guarded by the queue lock.
struct QueueState {
    /// Current merged working value
    working: Value,
    /// Last value the fast path accepted
    last_flushed: Option<Value>,
    /// Writes accumulated since the last flush
    pending: Vec<QueuedWrite>,
    /// Next write id
    next_id: u64,
    /// Outstanding debounce timer, replaced atomically on each update
    debounce: Option<JoinHandle<()>>,
    status: SaveStatus,
}

// == Auto-Save Queue ==
/// Write-coalescing save queue with priority-dependent debouncing.
///
/// Each mutating update merges into the working value and (re)schedules a
/// debounced flush; the flush drains everything queued since the last one
/// and persists exactly the highest-priority, most-recent snapshot.
///
/// Cloning is cheap; clones share the same queue instance.
#[derive(Clone)]
pub struct AutoSaveQueue {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    /// Storage key, derived from the owner's scoped key
    key: String,
    owner: OwnerContext,
    persistence: Arc<TieredPersistence>,
    state: Mutex<QueueState>,
    on_saved: StdMutex<Option<SavedCallback>>,
    on_error: StdMutex<Option<ErrorCallback>>,
}

impl AutoSaveQueue {
    // == Constructor ==
    /// Creates a queue for one save target.
    ///
    /// # Arguments
    /// * `owner` - Session context stamped on every persisted record
    /// * `persistence` - The tier chain flushes write through
    /// * `initial` - Starting working value
    pub fn new(owner: OwnerContext, persistence: Arc<TieredPersistence>, initial: Value) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                key: owner.scoped_key(),
                owner,
                persistence,
                state: Mutex::new(QueueState {
                    working: initial,
                    last_flushed: None,
                    pending: Vec::new(),
                    next_id: 0,
                    debounce: None,
                    status: SaveStatus::default(),
                }),
                on_saved: StdMutex::new(None),
                on_error: StdMutex::new(None),
            }),
        }
    }

    // == Callbacks ==
    /// Sets the completion callback, fired after every flush attempt.
    pub fn set_on_saved(&self, callback: SavedCallback) {
        *self
            .inner
            .on_saved
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(callback);
    }

    /// Sets the error callback, fired when the fast path rejects a flush.
    pub fn set_on_error(&self, callback: ErrorCallback) {
        *self
            .inner
            .on_error
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(callback);
    }

    // == Update Data ==
    /// Merges a partial payload into the working value and schedules a
    /// debounced flush.
    ///
    /// A merge that leaves the working value equal to the last flushed
    /// value queues nothing. Otherwise the merged snapshot is queued and
    /// any outstanding debounce timer is replaced with one at the new
    /// priority's delay.
    pub async fn update_data(&self, partial: Value, priority: SavePriority) {
        let mut state = self.inner.state.lock().await;
        deep_merge(&mut state.working, &partial);

        if state.last_flushed.as_ref() == Some(&state.working) {
            debug!(
                "Update for '{}' matches last flushed value, nothing queued",
                self.inner.key
            );
            return;
        }

        let write = QueuedWrite {
            id: state.next_id,
            payload: state.working.clone(),
            priority,
            enqueued_at: current_timestamp_ms(),
        };
        state.next_id += 1;
        state.pending.push(write);
        state.status.has_pending_writes = true;

        self.schedule_debounce(&mut state, priority);
    }

    // == Schedule Debounce ==
    /// Replaces the outstanding timer with one at the given priority's
    /// delay.
    fn schedule_debounce(&self, state: &mut QueueState, priority: SavePriority) {
        if let Some(handle) = state.debounce.take() {
            handle.abort();
        }

        let queue = self.clone();
        let delay = priority.debounce_delay();
        state.debounce = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Clear the handle slot before flushing; an abort arriving
            // after this point must not cancel an in-flight write.
            {
                let mut state = queue.inner.state.lock().await;
                state.debounce = None;
            }
            // Failures are reported through the error callback
            let _ = queue.flush().await;
        }));
    }

    // == Flush ==
    /// Drains the pending writes and persists the single winner: the
    /// highest-priority, most-recent snapshot. The rest are discarded.
    ///
    /// Flushes are serialized; a flush arriving while one is running
    /// returns immediately and leaves its writes for the finishing flush
    /// to reschedule.
    pub async fn flush(&self) -> SaveResult<()> {
        let winner = {
            let mut state = self.inner.state.lock().await;
            if state.status.is_flush_in_progress || state.pending.is_empty() {
                return Ok(());
            }
            state.status.is_flush_in_progress = true;

            let mut drained: Vec<QueuedWrite> = std::mem::take(&mut state.pending);
            drained.sort_by(|a, b| {
                a.priority
                    .cmp(&b.priority)
                    .then(b.enqueued_at.cmp(&a.enqueued_at))
                    .then(b.id.cmp(&a.id))
            });
            if drained.len() > 1 {
                debug!(
                    "Coalesced {} superseded writes for '{}'",
                    drained.len() - 1,
                    self.inner.key
                );
            }
            drained.remove(0)
        };

        let record = StoredRecord::new(&self.inner.owner, winner.payload.clone());
        let result = self.inner.persistence.persist(&self.inner.key, &record).await;

        let status = {
            let mut state = self.inner.state.lock().await;
            state.status.is_flush_in_progress = false;
            if result.is_ok() {
                state.status.last_successful_save = Some(record.saved_at);
                state.status.total_save_count += 1;
                state.last_flushed = Some(winner.payload);
            }
            state.status.has_pending_writes = !state.pending.is_empty();

            // Writes that arrived while the flush was in flight get a
            // fresh timer at their most urgent priority
            if let Some(priority) = state.pending.iter().map(|w| w.priority).min() {
                self.schedule_debounce(&mut state, priority);
            }

            state.status.clone()
        };

        if let Err(err) = &result {
            warn!("Flush for '{}' failed: {}", self.inner.key, err);
            if let Some(callback) = self
                .inner
                .on_error
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .as_ref()
            {
                callback(err);
            }
        }
        if let Some(callback) = self
            .inner
            .on_saved
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
        {
            callback(&status);
        }

        result
    }

    // == Force Save ==
    /// Cancels any pending debounce, enqueues the current working value at
    /// high priority, and flushes immediately.
    ///
    /// Used at navigation-away or an explicit save action; failure
    /// propagates to the caller.
    pub async fn force_save(&self) -> SaveResult<()> {
        {
            let mut state = self.inner.state.lock().await;
            if let Some(handle) = state.debounce.take() {
                handle.abort();
            }

            let write = QueuedWrite {
                id: state.next_id,
                payload: state.working.clone(),
                priority: SavePriority::High,
                enqueued_at: current_timestamp_ms(),
            };
            state.next_id += 1;
            state.pending.push(write);
            state.status.has_pending_writes = true;
        }
        self.flush().await
    }

    // == Clear Data ==
    /// Resets the working value, drops queued writes, and removes the
    /// persisted entries for this target.
    pub async fn clear_data(&self, initial: Value) {
        {
            let mut state = self.inner.state.lock().await;
            if let Some(handle) = state.debounce.take() {
                handle.abort();
            }
            state.pending.clear();
            state.working = initial;
            state.last_flushed = None;
            state.status.has_pending_writes = false;
        }
        self.inner.persistence.discard(&self.inner.key).await;
    }

    // == Shutdown ==
    /// Final flush on teardown; queued writes are not silently dropped on
    /// a normal shutdown.
    pub async fn shutdown(&self) -> SaveResult<()> {
        let pending = {
            let mut state = self.inner.state.lock().await;
            if let Some(handle) = state.debounce.take() {
                handle.abort();
            }
            !state.pending.is_empty()
        };

        if pending {
            self.flush().await
        } else {
            Ok(())
        }
    }

    // == Status ==
    /// Snapshot of the save status.
    pub async fn status(&self) -> SaveStatus {
        self.inner.state.lock().await.status.clone()
    }

    // == Working Data ==
    /// Clone of the current merged working value.
    pub async fn working_data(&self) -> Value {
        self.inner.state.lock().await.working.clone()
    }
}
