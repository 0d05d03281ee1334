// src/core/blocking.rs

//! Manages clients parked in `BLPOP`, waking them fairly (FIFO by arrival)
//! as matching `LPUSH`/`RPUSH` calls land.

use bytes::Bytes;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

use crate::core::storage::{Db, PopDirection};

struct Waiter {
    delivered: Arc<AtomicBool>,
    tx: Option<oneshot::Sender<Bytes>>,
}

/// Tracks, per list key, the FIFO queue of clients parked waiting for an
/// element to become available.
#[derive(Debug, Default)]
pub struct BlockerManager {
    waiters: DashMap<Bytes, VecDeque<Waiter>>,
}

impl BlockerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops one element from `key` for the calling client, blocking up to
    /// `timeout` (zero means wait forever) if the list is currently empty.
    /// Returns `None` on timeout.
    pub async fn block_on_pop(
        &self,
        db: &Db,
        key: &Bytes,
        timeout: Duration,
    ) -> Result<Option<Bytes>, crate::core::errors::BasaltError> {
        db.check_is_list(key)?;
        let immediate = db.lists.pop(key, PopDirection::Left, 1);
        if let Some(v) = immediate.into_iter().next() {
            return Ok(Some(v));
        }

        let delivered = Arc::new(AtomicBool::new(false));
        let (tx, rx) = oneshot::channel();
        self.waiters
            .entry(key.clone())
            .or_default()
            .push_back(Waiter {
                delivered: delivered.clone(),
                tx: Some(tx),
            });

        let result = if timeout.is_zero() {
            rx.await.ok()
        } else {
            match tokio::time::timeout(timeout, rx).await {
                Ok(r) => r.ok(),
                Err(_) => None,
            }
        };

        if result.is_none() {
            // Timed out (or channel dropped): mark ourselves as delivered so a
            // concurrent `wake_waiters` pass skips us instead of double-waking,
            // and remove ourselves from the queue immediately rather than
            // waiting for some future push to sweep us out.
            delivered.store(true, Ordering::SeqCst);
            if let Some(mut queue) = self.waiters.get_mut(key) {
                queue.retain(|w| !Arc::ptr_eq(&w.delivered, &delivered));
            }
        }

        Ok(result)
    }

    /// Called after every successful push to `key`. Hands one element to the
    /// longest-waiting client, if any are parked, repeating while both the
    /// list and the waiter queue are non-empty.
    pub fn wake_waiters(&self, db: &Db, key: &Bytes) {
        loop {
            let next_waiter = {
                let Some(mut queue) = self.waiters.get_mut(key) else {
                    return;
                };
                loop {
                    match queue.pop_front() {
                        Some(w) if w.delivered.load(Ordering::SeqCst) => continue,
                        Some(w) => break Some(w),
                        None => break None,
                    }
                }
            };
            let Some(waiter) = next_waiter else {
                return;
            };
            let popped = db.lists.pop(key, PopDirection::Left, 1);
            let Some(value) = popped.into_iter().next() else {
                // Nothing left to give; put a fresh un-delivered marker back
                // is unnecessary since this waiter is already removed and will
                // simply time out or stay parked via its own awaited receiver.
                // Re-enqueue it at the front so it's first in line next time.
                if let Some(mut queue) = self.waiters.get_mut(key) {
                    queue.push_front(waiter);
                }
                return;
            };
            waiter.delivered.store(true, Ordering::SeqCst);
            if let Some(tx) = waiter.tx {
                let _ = tx.send(value);
            }
        }
    }
}
