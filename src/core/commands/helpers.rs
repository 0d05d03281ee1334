// src/core/commands/helpers.rs

//! Provides helper functions for parsing command arguments from `RespFrame`s.
//! These helpers reduce boilerplate and ensure consistent error handling across commands.

use crate::core::errors::BasaltError;
use crate::core::protocol::RespFrame;
use bytes::Bytes;

/// Extracts a `String` from a `RespFrame::BulkString`.
pub fn extract_string(frame: &RespFrame) -> Result<String, BasaltError> {
    if let RespFrame::BulkString(bs) = frame {
        String::from_utf8(bs.to_vec()).map_err(|_| BasaltError::SyntaxError)
    } else {
        Err(BasaltError::SyntaxError)
    }
}

/// Extracts `Bytes` from a `RespFrame::BulkString`.
pub fn extract_bytes(frame: &RespFrame) -> Result<Bytes, BasaltError> {
    match frame {
        RespFrame::BulkString(bs) => Ok(bs.clone()),
        _ => Err(BasaltError::SyntaxError),
    }
}

/// Validates that the number of arguments matches an exact expected count.
pub fn validate_arg_count(
    args: &[RespFrame],
    expected: usize,
    cmd: &str,
) -> Result<(), BasaltError> {
    if args.len() != expected {
        Err(BasaltError::WrongArgumentCount(cmd.to_string()))
    } else {
        Ok(())
    }
}

/// Parses arguments for commands that follow the pattern `COMMAND key value1 [value2 ...]`.
pub fn parse_key_and_values(
    args: &[RespFrame],
    min_args: usize,
    cmd: &str,
) -> Result<(Bytes, Vec<Bytes>), BasaltError> {
    if args.len() < min_args {
        return Err(BasaltError::WrongArgumentCount(cmd.to_string()));
    }
    let key = extract_bytes(&args[0])?;
    let values = args[1..]
        .iter()
        .map(extract_bytes)
        .collect::<Result<_, _>>()?;
    Ok((key, values))
}
