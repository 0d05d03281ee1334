// src/core/stream_blocking.rs

//! Manages clients parked in `XREAD ... BLOCK`, which may wait on several
//! stream keys at once and must wake as soon as any one of them receives a
//! new entry.

use bytes::Bytes;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Notify;

/// Tracks, per stream key, the set of notification handles for clients
/// currently waiting on that key (possibly among others).
#[derive(Debug, Default)]
pub struct StreamBlockerManager {
    waiters: DashMap<Bytes, VecDeque<Arc<Notify>>>,
}

impl StreamBlockerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wakes every client currently waiting on `key`. Called after every
    /// successful `XADD`.
    pub fn notify(&self, key: &Bytes) {
        if let Some(queue) = self.waiters.get(key) {
            for notify in queue.iter() {
                notify.notify_one();
            }
        }
    }

    fn register(&self, keys: &[Bytes], notify: &Arc<Notify>) {
        for key in keys {
            self.waiters
                .entry(key.clone())
                .or_default()
                .push_back(notify.clone());
        }
    }

    fn unregister(&self, keys: &[Bytes], notify: &Arc<Notify>) {
        for key in keys {
            if let Some(mut queue) = self.waiters.get_mut(key) {
                queue.retain(|n| !Arc::ptr_eq(n, notify));
            }
        }
    }

    /// Blocks until `check` reports a match, a notification arrives for any
    /// of `keys` (after which `check` is re-run), or `timeout_ms` elapses
    /// (`0` means wait forever). `check` is invoked with no store lock held.
    pub async fn block_until<F>(&self, keys: &[Bytes], timeout_ms: u64, mut check: F) -> bool
    where
        F: FnMut() -> bool,
    {
        if check() {
            return true;
        }

        let notify = Arc::new(Notify::new());
        self.register(keys, &notify);

        let deadline = (timeout_ms > 0).then(|| Instant::now() + Duration::from_millis(timeout_ms));

        let result = loop {
            let wait = notify.notified();
            let woke = match deadline {
                Some(d) => {
                    let remaining = d.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        break false;
                    }
                    tokio::time::timeout(remaining, wait).await.is_ok()
                }
                None => {
                    wait.await;
                    true
                }
            };
            if !woke {
                break false;
            }
            if check() {
                break true;
            }
            if let Some(d) = deadline
                && Instant::now() >= d
            {
                break false;
            }
        };

        self.unregister(keys, &notify);
        result
    }
}
