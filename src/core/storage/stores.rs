// src/core/storage/stores.rs

//! The keyspace: one independently-locked store per data type. Splitting
//! storage this way (rather than a single sharded map of a tagged union, as
//! in earlier designs) means a blocking read on the list store never holds
//! up a concurrent write to the string store, and a client parked in
//! `BLPOP`/`XREAD BLOCK` never holds a lock while it awaits.

use crate::core::errors::BasaltError;
use crate::core::storage::stream::Stream;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopDirection {
    Left,
    Right,
}

#[derive(Debug, Clone)]
struct StringEntry {
    value: Bytes,
    expiry: Option<Instant>,
}

impl StringEntry {
    fn is_expired(&self) -> bool {
        self.expiry.is_some_and(|e| e <= Instant::now())
    }
}

/// Stores `STRING` values, keyed by name, with optional millisecond TTLs.
/// Expiry is lazy: a key past its expiry is treated as absent and purged on
/// the next access that touches it. There is no background reaper.
#[derive(Debug, Default)]
pub struct StringStore {
    inner: Mutex<HashMap<Bytes, StringEntry>>,
}

impl StringStore {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn contains(&self, key: &Bytes) -> bool {
        let mut guard = self.inner.lock().unwrap();
        match guard.get(key) {
            Some(e) if e.is_expired() => {
                guard.remove(key);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    pub fn get(&self, key: &Bytes) -> Option<Bytes> {
        let mut guard = self.inner.lock().unwrap();
        match guard.get(key) {
            Some(e) if e.is_expired() => {
                guard.remove(key);
                None
            }
            Some(e) => Some(e.value.clone()),
            None => None,
        }
    }

    pub fn set(&self, key: Bytes, value: Bytes, px_millis: Option<u64>) {
        let expiry = px_millis.map(|ms| Instant::now() + Duration::from_millis(ms));
        self.inner.lock().unwrap().insert(key, StringEntry { value, expiry });
    }

    /// Parses the current value (or `0` if absent/expired) as an `i64`, adds
    /// `by`, and stores the result back, preserving any existing TTL.
    pub fn incr_by(&self, key: &Bytes, by: i64) -> Result<i64, BasaltError> {
        let mut guard = self.inner.lock().unwrap();
        let live = guard.get(key).filter(|e| !e.is_expired());
        let current: i64 = match live {
            Some(e) => std::str::from_utf8(&e.value)
                .map_err(|_| BasaltError::NotAnInteger)?
                .parse()
                .map_err(|_| BasaltError::NotAnInteger)?,
            None => 0,
        };
        let new_val = current.checked_add(by).ok_or(BasaltError::NotAnInteger)?;
        let expiry = live.and_then(|e| e.expiry);
        guard.insert(
            key.clone(),
            StringEntry {
                value: Bytes::from(new_val.to_string()),
                expiry,
            },
        );
        Ok(new_val)
    }
}

/// Stores `LIST` values as double-ended queues. A list that becomes empty is
/// removed outright; there is no such thing as an empty list key.
#[derive(Debug, Default)]
pub struct ListStore {
    inner: Mutex<HashMap<Bytes, VecDeque<Bytes>>>,
}

impl ListStore {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn contains(&self, key: &Bytes) -> bool {
        self.inner.lock().unwrap().contains_key(key)
    }

    /// Pushes `values` onto `key` in order, returning the new length.
    pub fn push(&self, key: &Bytes, values: &[Bytes], direction: PushDirection) -> usize {
        let mut guard = self.inner.lock().unwrap();
        let list = guard.entry(key.clone()).or_default();
        for value in values {
            match direction {
                PushDirection::Left => list.push_front(value.clone()),
                PushDirection::Right => list.push_back(value.clone()),
            }
        }
        list.len()
    }

    /// Pops up to `count` values from `key`, removing the key if it becomes empty.
    pub fn pop(&self, key: &Bytes, direction: PopDirection, count: usize) -> Vec<Bytes> {
        let mut guard = self.inner.lock().unwrap();
        let mut popped = Vec::new();
        let Some(list) = guard.get_mut(key) else {
            return popped;
        };
        for _ in 0..count {
            let next = match direction {
                PopDirection::Left => list.pop_front(),
                PopDirection::Right => list.pop_back(),
            };
            match next {
                Some(v) => popped.push(v),
                None => break,
            }
        }
        if list.is_empty() {
            guard.remove(key);
        }
        popped
    }

    pub fn len(&self, key: &Bytes) -> usize {
        self.inner.lock().unwrap().get(key).map_or(0, |l| l.len())
    }

    /// Returns the elements of `key` in `[start, stop]` (inclusive), both
    /// already normalized against the list's current length by the caller.
    pub fn range(&self, key: &Bytes, start: usize, stop: usize) -> Vec<Bytes> {
        let guard = self.inner.lock().unwrap();
        let Some(list) = guard.get(key) else {
            return Vec::new();
        };
        if start > stop || start >= list.len() {
            return Vec::new();
        }
        let stop = stop.min(list.len() - 1);
        list.iter().skip(start).take(stop - start + 1).cloned().collect()
    }
}

/// Stores `STREAM` values. `with_stream` creates the stream on first access
/// (mirroring `XADD`'s implicit-creation semantics); callers that must not
/// create streams (e.g. `XLEN`, `XRANGE` on a missing key) use `read` instead.
#[derive(Debug, Default)]
pub struct StreamStore {
    inner: Mutex<HashMap<Bytes, Stream>>,
}

impl StreamStore {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn contains(&self, key: &Bytes) -> bool {
        self.inner.lock().unwrap().contains_key(key)
    }

    pub fn with_stream<R>(&self, key: &Bytes, f: impl FnOnce(&mut Stream) -> R) -> R {
        let mut guard = self.inner.lock().unwrap();
        let stream = guard.entry(key.clone()).or_default();
        f(stream)
    }

    pub fn read<R>(&self, key: &Bytes, f: impl FnOnce(Option<&Stream>) -> R) -> R {
        let guard = self.inner.lock().unwrap();
        f(guard.get(key))
    }
}

/// The full keyspace, one lock per type. `check_*` helpers enforce
/// `WRONGTYPE` semantics: a key name is implicitly typed by whichever store
/// first creates it, and every other store must treat it as absent/foreign.
#[derive(Debug, Default)]
pub struct Db {
    pub strings: StringStore,
    pub lists: ListStore,
    pub streams: StreamStore,
}

impl Db {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn check_is_list(&self, key: &Bytes) -> Result<(), BasaltError> {
        if self.strings.contains(key) || self.streams.contains(key) {
            return Err(BasaltError::WrongType);
        }
        Ok(())
    }

    pub fn check_is_string(&self, key: &Bytes) -> Result<(), BasaltError> {
        if self.lists.contains(key) || self.streams.contains(key) {
            return Err(BasaltError::WrongType);
        }
        Ok(())
    }

    pub fn check_is_stream(&self, key: &Bytes) -> Result<(), BasaltError> {
        if self.strings.contains(key) || self.lists.contains(key) {
            return Err(BasaltError::WrongType);
        }
        Ok(())
    }

    /// Unconditionally stores `value` under `key` as a `STRING`, clearing any
    /// prior `LIST`/`STREAM` occupant so that at most one type ever holds the
    /// key at a time.
    pub fn set_string(&self, key: Bytes, value: Bytes, px_millis: Option<u64>) {
        self.lists.inner.lock().unwrap().remove(&key);
        self.streams.inner.lock().unwrap().remove(&key);
        self.strings.set(key, value, px_millis);
    }

    /// Returns the RESP `TYPE` name for `key`, or `"none"` if absent.
    pub fn type_of(&self, key: &Bytes) -> &'static str {
        if self.strings.contains(key) {
            "string"
        } else if self.lists.contains(key) {
            "list"
        } else if self.streams.contains(key) {
            "stream"
        } else {
            "none"
        }
    }
}
