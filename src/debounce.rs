//! Per-task coalescing of progress submissions.
//!
//! Repeated submissions for one task inside the window collapse into a
//! single write carrying the last submitted value. Each submission restarts
//! the task's timer, and every caller that joined receives the outcome of
//! that one write.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracker_core::models::{NewProgress, Progress};
use tracker_core::Database;

use crate::blocking::with_db;
use crate::error::AppError;

type Outcome = Result<Progress, AppError>;

struct Pending {
    generation: u64,
    input: NewProgress,
    waiters: Vec<oneshot::Sender<Outcome>>,
    timer: JoinHandle<()>,
}

struct Inner {
    db: Database,
    window: Duration,
    pending: Mutex<HashMap<i64, Pending>>,
    generation: AtomicU64,
    closed: AtomicBool,
}

#[derive(Clone)]
pub struct ProgressDebouncer {
    inner: Arc<Inner>,
}

impl ProgressDebouncer {
    pub fn new(db: Database, window: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                db,
                window,
                pending: Mutex::new(HashMap::new()),
                generation: AtomicU64::new(0),
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn window(&self) -> Duration {
        self.inner.window
    }

    /// Number of tasks with a write waiting on its timer.
    pub fn pending_len(&self) -> usize {
        self.lock().len()
    }

    /// Submits progress and waits for the coalesced write it ends up in.
    pub async fn submit(&self, input: NewProgress) -> Outcome {
        if self.inner.window.is_zero() {
            if self.inner.closed.load(Ordering::SeqCst) {
                return Err(AppError::Cancelled);
            }
            return with_db(&self.inner.db, move |db| db.insert_progress(&input)).await;
        }

        let rx = self.enqueue(input)?;
        rx.await.unwrap_or(Err(AppError::Cancelled))
    }

    /// Cancels every pending write. Their callers get [`AppError::Cancelled`]
    /// and later submissions are refused.
    pub fn shutdown(&self) -> usize {
        self.inner.closed.store(true, Ordering::SeqCst);

        let drained: Vec<Pending> = self.lock().drain().map(|(_, p)| p).collect();
        let cancelled = drained.len();
        for pending in drained {
            pending.timer.abort();
            for waiter in pending.waiters {
                let _ = waiter.send(Err(AppError::Cancelled));
            }
        }

        if cancelled > 0 {
            tracing::warn!("Cancelled {} pending progress submissions", cancelled);
        }
        cancelled
    }

    fn enqueue(&self, input: NewProgress) -> Result<oneshot::Receiver<Outcome>, AppError> {
        let (tx, rx) = oneshot::channel();
        let mut pending = self.lock();

        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(AppError::Cancelled);
        }

        let task_id = input.task_id;
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst);
        let timer = self.spawn_timer(task_id, generation);

        match pending.entry(task_id) {
            Entry::Occupied(mut entry) => {
                let slot = entry.get_mut();
                slot.timer.abort();
                slot.timer = timer;
                slot.generation = generation;
                slot.input = input;
                slot.waiters.push(tx);
                tracing::debug!(
                    task_id,
                    waiters = slot.waiters.len(),
                    "Coalesced progress submission"
                );
            }
            Entry::Vacant(entry) => {
                entry.insert(Pending {
                    generation,
                    input,
                    waiters: vec![tx],
                    timer,
                });
            }
        }

        Ok(rx)
    }

    fn spawn_timer(&self, task_id: i64, generation: u64) -> JoinHandle<()> {
        let debouncer = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(debouncer.inner.window).await;
            debouncer.fire(task_id, generation).await;
        })
    }

    async fn fire(&self, task_id: i64, generation: u64) {
        let pending = {
            let mut map = self.lock();
            let current = map.get(&task_id).map(|p| p.generation);
            // A different generation means a newer submission took over
            if current == Some(generation) {
                map.remove(&task_id)
            } else {
                None
            }
        };
        let Some(pending) = pending else {
            return;
        };

        let input = pending.input;
        let outcome = with_db(&self.inner.db, move |db| db.insert_progress(&input)).await;
        for waiter in pending.waiters {
            let _ = waiter.send(outcome.clone());
        }
    }

    #[cfg(test)]
    fn waiters(&self, task_id: i64) -> usize {
        self.lock().get(&task_id).map_or(0, |p| p.waiters.len())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<i64, Pending>> {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
