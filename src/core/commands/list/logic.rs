// src/core/commands/list/logic.rs

use crate::core::commands::command_trait::WriteOutcome;
use crate::core::errors::BasaltError;
use crate::core::state::ExecutionContext;
use crate::core::storage::{PopDirection, PushDirection};
use crate::core::RespValue;
use bytes::Bytes;

/// Normalizes a Redis-style `[start, stop]` range (negative indices count from
/// the end, both bounds inclusive) against a sequence of length `len`.
/// Returns `None` when the normalized range is empty.
pub(crate) fn normalize_range(len: i64, start: i64, stop: i64) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop };

    if start >= len || stop < 0 || start > stop {
        return None;
    }

    let start = start as usize;
    let stop = (stop.min(len - 1)) as usize;
    Some((start, stop))
}

/// Shared logic for `LPUSH` and `RPUSH`.
pub(crate) async fn list_push_logic(
    ctx: &ExecutionContext,
    key: &Bytes,
    values: &[Bytes],
    direction: PushDirection,
) -> Result<(RespValue, WriteOutcome), BasaltError> {
    ctx.db.check_is_list(key)?;
    let new_len = ctx.db.lists.push(key, values, direction);
    ctx.state.blocker_manager.wake_waiters(&ctx.db, key);
    Ok((
        RespValue::Integer(new_len as i64),
        WriteOutcome::Write { keys_modified: 1 },
    ))
}

/// Shared logic for `LPOP`, returning up to `count` elements.
pub(crate) async fn list_pop_logic(
    ctx: &ExecutionContext,
    key: &Bytes,
    direction: PopDirection,
    count: Option<usize>,
) -> Result<(RespValue, WriteOutcome), BasaltError> {
    ctx.db.check_is_list(key)?;
    let key_existed = ctx.db.lists.contains(key);
    if !key_existed {
        let reply = if count.is_some() {
            RespValue::NullArray
        } else {
            RespValue::Null
        };
        return Ok((reply, WriteOutcome::DidNotWrite));
    }

    let popped = ctx.db.lists.pop(key, direction, count.unwrap_or(1));

    let outcome = if popped.is_empty() {
        WriteOutcome::DidNotWrite
    } else if ctx.db.lists.contains(key) {
        WriteOutcome::Write { keys_modified: 1 }
    } else {
        WriteOutcome::Delete { keys_deleted: 1 }
    };

    let reply = match count {
        None => match popped.into_iter().next() {
            Some(v) => RespValue::BulkString(v),
            None => RespValue::Null,
        },
        Some(_) => RespValue::Array(popped.into_iter().map(RespValue::BulkString).collect()),
    };

    Ok((reply, outcome))
}

#[cfg(test)]
mod tests {
    use super::normalize_range;

    #[test]
    fn empty_list_has_no_range() {
        assert_eq!(normalize_range(0, 0, -1), None);
    }

    #[test]
    fn full_range_via_negative_indices() {
        assert_eq!(normalize_range(5, 0, -1), Some((0, 4)));
    }

    #[test]
    fn negative_start_clamped_to_zero() {
        assert_eq!(normalize_range(5, -100, 2), Some((0, 2)));
    }

    #[test]
    fn stop_beyond_len_clamped_to_last_index() {
        assert_eq!(normalize_range(5, 1, 100), Some((1, 4)));
    }

    #[test]
    fn start_after_stop_is_empty() {
        assert_eq!(normalize_range(5, 3, 1), None);
    }

    #[test]
    fn start_at_or_past_len_is_empty() {
        assert_eq!(normalize_range(5, 5, 10), None);
    }

    #[test]
    fn stop_fully_negative_and_before_start_is_empty() {
        assert_eq!(normalize_range(5, 0, -6), None);
    }
}
