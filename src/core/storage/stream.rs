// src/core/storage/stream.rs

use bytes::Bytes;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// A stream entry identifier: a millisecond timestamp paired with a sequence
/// number, ordered lexicographically by `(timestamp_ms, sequence)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StreamId {
    pub timestamp_ms: u64,
    pub sequence: u64,
}

impl StreamId {
    pub fn new(timestamp_ms: u64, sequence: u64) -> Self {
        Self {
            timestamp_ms,
            sequence,
        }
    }

    pub const MIN: StreamId = StreamId {
        timestamp_ms: 0,
        sequence: 0,
    };

    pub const MAX: StreamId = StreamId {
        timestamp_ms: u64::MAX,
        sequence: u64::MAX,
    };
}

#[derive(Debug, PartialEq, Eq)]
pub struct StreamIdParseError(&'static str);

impl fmt::Display for StreamIdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StreamId {
    type Err = StreamIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "0" {
            return Ok(StreamId::new(0, 0));
        }

        let parts: Vec<&str> = s.split('-').collect();
        match parts.len() {
            1 => {
                let timestamp_ms = parts[0]
                    .parse()
                    .map_err(|_| StreamIdParseError("Invalid timestamp"))?;
                Ok(StreamId::new(timestamp_ms, 0))
            }
            2 => {
                let timestamp_ms = parts[0]
                    .parse()
                    .map_err(|_| StreamIdParseError("Invalid timestamp"))?;
                let sequence = parts[1]
                    .parse()
                    .map_err(|_| StreamIdParseError("Invalid sequence"))?;
                Ok(StreamId::new(timestamp_ms, sequence))
            }
            _ => Err(StreamIdParseError("Invalid Stream ID format")),
        }
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.timestamp_ms, self.sequence)
    }
}

/// What `XADD` was asked to use as the new entry's ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSpec {
    /// `*`: generate both the millisecond timestamp and the sequence.
    Auto,
    /// `<m>-*`: use `m` as given, auto-generate the sequence within it.
    AutoSeq(u64),
    /// `<m>-<s>`: fully explicit.
    Explicit(StreamId),
}

impl Default for IdSpec {
    fn default() -> Self {
        IdSpec::Auto
    }
}

/// A single stream entry: an ID plus its ordered field/value pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEntry {
    pub id: StreamId,
    pub fields: IndexMap<Bytes, Bytes>,
}

/// An append-only log of `StreamEntry` values, keyed by `XADD`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stream {
    pub entries: BTreeMap<StreamId, StreamEntry>,
    pub last_generated_id: StreamId,
}

impl Stream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Computes the sequence number for an auto-generated ID at the given
    /// millisecond timestamp, following the same timestamp-increment rule as
    /// the wall clock: if `m` matches the last entry's timestamp, the sequence
    /// continues from there; otherwise it resets to zero, except for the
    /// empty-stream case where the very first auto-id at millisecond zero
    /// must still satisfy the "greater than 0-0" invariant and so starts at one.
    fn next_seq_for(&self, m: u64) -> u64 {
        if self.entries.is_empty() {
            if m == 0 { 1 } else { 0 }
        } else if m == self.last_generated_id.timestamp_ms {
            self.last_generated_id.sequence + 1
        } else if m > self.last_generated_id.timestamp_ms {
            0
        } else {
            // Clock moved backwards; continue from the last known timestamp.
            self.last_generated_id.sequence + 1
        }
    }

    /// Appends a new entry per `id_spec` (see [`IdSpec`]).
    pub fn add_entry(
        &mut self,
        id_spec: IdSpec,
        fields: IndexMap<Bytes, Bytes>,
    ) -> Result<StreamId, &'static str> {
        let new_id = match id_spec {
            IdSpec::Explicit(id) => {
                if id == StreamId::new(0, 0) {
                    return Err("ERR The ID specified in XADD must be greater than 0-0");
                }
                if id <= self.last_generated_id && !self.entries.is_empty() {
                    return Err(
                        "ERR The ID specified in XADD is equal or smaller than the target stream top item",
                    );
                }
                if id <= self.last_generated_id && self.entries.is_empty() && id == StreamId::MIN {
                    return Err("ERR The ID specified in XADD must be greater than 0-0");
                }
                id
            }
            IdSpec::Auto => {
                let now_ms = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap()
                    .as_millis() as u64;
                let m = now_ms.max(self.last_generated_id.timestamp_ms);
                let seq = self.next_seq_for(m);
                StreamId::new(m, seq)
            }
            IdSpec::AutoSeq(m) => {
                if m < self.last_generated_id.timestamp_ms && !self.entries.is_empty() {
                    return Err(
                        "ERR The ID specified in XADD is equal or smaller than the target stream top item",
                    );
                }
                let seq = self.next_seq_for(m);
                let new_id = StreamId::new(m, seq);
                if new_id == StreamId::new(0, 0) {
                    return Err("ERR The ID specified in XADD must be greater than 0-0");
                }
                new_id
            }
        };

        let entry = StreamEntry {
            id: new_id,
            fields,
        };
        self.entries.insert(new_id, entry);
        self.last_generated_id = new_id;

        Ok(new_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_and_full_ids() {
        assert_eq!("0".parse::<StreamId>().unwrap(), StreamId::new(0, 0));
        assert_eq!("5".parse::<StreamId>().unwrap(), StreamId::new(5, 0));
        assert_eq!("5-3".parse::<StreamId>().unwrap(), StreamId::new(5, 3));
        assert!("abc".parse::<StreamId>().is_err());
    }

    #[test]
    fn rejects_zero_zero() {
        let mut s = Stream::new();
        let err = s
            .add_entry(IdSpec::Explicit(StreamId::new(0, 0)), IndexMap::new())
            .unwrap_err();
        assert_eq!(err, "ERR The ID specified in XADD must be greater than 0-0");
    }

    #[test]
    fn rejects_non_increasing_ids() {
        let mut s = Stream::new();
        s.add_entry(IdSpec::Explicit(StreamId::new(5, 0)), IndexMap::new())
            .unwrap();
        let err = s
            .add_entry(IdSpec::Explicit(StreamId::new(5, 0)), IndexMap::new())
            .unwrap_err();
        assert_eq!(
            err,
            "ERR The ID specified in XADD is equal or smaller than the target stream top item"
        );
    }

    #[test]
    fn auto_id_increments_sequence_within_same_millisecond() {
        let mut s = Stream::new();
        let id1 = s.add_entry(IdSpec::Explicit(StreamId::new(100, 0)), IndexMap::new()).unwrap();
        assert_eq!(id1, StreamId::new(100, 0));
    }

    #[test]
    fn auto_seq_continues_within_same_explicit_millis() {
        let mut s = Stream::new();
        let id1 = s
            .add_entry(IdSpec::Explicit(StreamId::new(5, 0)), IndexMap::new())
            .unwrap();
        assert_eq!(id1, StreamId::new(5, 0));

        let id2 = s.add_entry(IdSpec::AutoSeq(5), IndexMap::new()).unwrap();
        assert_eq!(id2, StreamId::new(5, 1));
    }

    #[test]
    fn auto_seq_resets_to_zero_on_new_millis() {
        let mut s = Stream::new();
        s.add_entry(IdSpec::Explicit(StreamId::new(5, 3)), IndexMap::new())
            .unwrap();

        let id = s.add_entry(IdSpec::AutoSeq(6), IndexMap::new()).unwrap();
        assert_eq!(id, StreamId::new(6, 0));
    }

    #[test]
    fn auto_seq_rejects_millis_older_than_last_entry() {
        let mut s = Stream::new();
        s.add_entry(IdSpec::Explicit(StreamId::new(10, 0)), IndexMap::new())
            .unwrap();

        let err = s.add_entry(IdSpec::AutoSeq(5), IndexMap::new()).unwrap_err();
        assert_eq!(
            err,
            "ERR The ID specified in XADD is equal or smaller than the target stream top item"
        );
    }
}
