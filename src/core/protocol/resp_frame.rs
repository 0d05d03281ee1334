// src/core/protocol/resp_frame.rs

//! The RESP2 wire frame type and its streaming decoder/encoder.

use crate::core::errors::BasaltError;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// A single RESP2 frame, either read off the wire or about to be written to it.
#[derive(Debug, Clone, PartialEq)]
pub enum RespFrame {
    SimpleString(String),
    Error(String),
    Integer(i64),
    BulkString(Bytes),
    Null,
    NullArray,
    Array(Vec<RespFrame>),
}

impl RespFrame {
    /// Encodes this frame to a freshly-allocated byte buffer. Used for
    /// one-off writes (replies, propagated commands) outside the `Encoder`
    /// trait's buffer-reuse path.
    pub fn encode_to_vec(&self) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_frame(self, &mut buf);
        buf.to_vec()
    }
}

fn encode_frame(frame: &RespFrame, dst: &mut BytesMut) {
    match frame {
        RespFrame::SimpleString(s) => {
            dst.put_u8(b'+');
            dst.put_slice(s.as_bytes());
            dst.put_slice(b"\r\n");
        }
        RespFrame::Error(s) => {
            dst.put_u8(b'-');
            dst.put_slice(s.as_bytes());
            dst.put_slice(b"\r\n");
        }
        RespFrame::Integer(i) => {
            dst.put_u8(b':');
            dst.put_slice(i.to_string().as_bytes());
            dst.put_slice(b"\r\n");
        }
        RespFrame::BulkString(b) => {
            dst.put_u8(b'$');
            dst.put_slice(b.len().to_string().as_bytes());
            dst.put_slice(b"\r\n");
            dst.put_slice(b);
            dst.put_slice(b"\r\n");
        }
        RespFrame::Null => {
            dst.put_slice(b"$-1\r\n");
        }
        RespFrame::NullArray => {
            dst.put_slice(b"*-1\r\n");
        }
        RespFrame::Array(items) => {
            dst.put_u8(b'*');
            dst.put_slice(items.len().to_string().as_bytes());
            dst.put_slice(b"\r\n");
            for item in items {
                encode_frame(item, dst);
            }
        }
    }
}

/// A `tokio_util::codec::{Decoder, Encoder}` for RESP2 frames.
#[derive(Debug, Default, Clone, Copy)]
pub struct RespFrameCodec;

impl RespFrameCodec {
    pub fn new() -> Self {
        Self
    }
}

/// Finds the index of the next `\r\n` in `src` starting at `from`.
fn find_crlf(src: &[u8], from: usize) -> Option<usize> {
    if from > src.len() {
        return None;
    }
    src[from..]
        .windows(2)
        .position(|w| w == b"\r\n")
        .map(|p| from + p)
}

/// Reads a single line (up to but excluding `\r\n`) starting at `src[0]`,
/// returning the line and the number of bytes consumed including the CRLF.
fn read_line(src: &[u8]) -> Option<(&[u8], usize)> {
    let end = find_crlf(src, 0)?;
    Some((&src[..end], end + 2))
}

/// Parses one frame from the front of `src`. Returns `Ok(None)` if `src`
/// does not yet contain a complete frame; does not consume anything in that
/// case. Returns `(frame, bytes_consumed)` on success.
fn try_parse(src: &[u8]) -> Result<Option<(RespFrame, usize)>, BasaltError> {
    if src.is_empty() {
        return Ok(None);
    }
    let tag = src[0];
    let body = &src[1..];
    match tag {
        b'+' => {
            let Some((line, consumed)) = read_line(body) else {
                return Ok(None);
            };
            let s = String::from_utf8_lossy(line).into_owned();
            Ok(Some((RespFrame::SimpleString(s), 1 + consumed)))
        }
        b'-' => {
            let Some((line, consumed)) = read_line(body) else {
                return Ok(None);
            };
            let s = String::from_utf8_lossy(line).into_owned();
            Ok(Some((RespFrame::Error(s), 1 + consumed)))
        }
        b':' => {
            let Some((line, consumed)) = read_line(body) else {
                return Ok(None);
            };
            let n = std::str::from_utf8(line)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| BasaltError::ProtocolError("invalid integer".into()))?;
            Ok(Some((RespFrame::Integer(n), 1 + consumed)))
        }
        b'$' => {
            let Some((line, header_consumed)) = read_line(body) else {
                return Ok(None);
            };
            let len = std::str::from_utf8(line)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| BasaltError::ProtocolError("invalid bulk length".into()))?;
            if len == -1 {
                return Ok(Some((RespFrame::Null, 1 + header_consumed)));
            }
            if len < 0 {
                return Err(BasaltError::ProtocolError("negative bulk length".into()));
            }
            let len = len as usize;
            let data_start = 1 + header_consumed;
            let needed = data_start + len + 2;
            if src.len() < needed {
                return Ok(None);
            }
            let data = Bytes::copy_from_slice(&src[data_start..data_start + len]);
            if &src[data_start + len..needed] != b"\r\n" {
                return Err(BasaltError::ProtocolError("malformed bulk string".into()));
            }
            Ok(Some((RespFrame::BulkString(data), needed)))
        }
        b'*' => {
            let Some((line, header_consumed)) = read_line(body) else {
                return Ok(None);
            };
            let count = std::str::from_utf8(line)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| BasaltError::ProtocolError("invalid array length".into()))?;
            if count == -1 {
                return Ok(Some((RespFrame::NullArray, 1 + header_consumed)));
            }
            if count < 0 {
                return Err(BasaltError::ProtocolError("negative array length".into()));
            }
            let mut offset = 1 + header_consumed;
            let mut items = Vec::with_capacity(count as usize);
            for _ in 0..count {
                match try_parse(&src[offset..])? {
                    Some((frame, used)) => {
                        items.push(frame);
                        offset += used;
                    }
                    None => return Ok(None),
                }
            }
            Ok(Some((RespFrame::Array(items), offset)))
        }
        other => Err(BasaltError::ProtocolError(format!(
            "invalid frame type byte '{}'",
            other as char
        ))),
    }
}

impl Decoder for RespFrameCodec {
    type Item = RespFrame;
    type Error = BasaltError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match try_parse(src)? {
            Some((frame, consumed)) => {
                src.advance(consumed);
                Ok(Some(frame))
            }
            None => Ok(None),
        }
    }
}

impl Encoder<RespFrame> for RespFrameCodec {
    type Error = BasaltError;

    fn encode(&mut self, item: RespFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_frame(&item, dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_simple_array_command() {
        let mut buf = BytesMut::from(&b"*2\r\n$4\r\nPING\r\n$2\r\nhi\r\n"[..]);
        let mut codec = RespFrameCodec::new();
        let frame = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(
            frame,
            RespFrame::Array(vec![
                RespFrame::BulkString(Bytes::from_static(b"PING")),
                RespFrame::BulkString(Bytes::from_static(b"hi")),
            ])
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn returns_none_on_incomplete_frame() {
        let mut buf = BytesMut::from(&b"*2\r\n$4\r\nPING\r\n$2\r\nh"[..]);
        let mut codec = RespFrameCodec::new();
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn round_trips_bulk_string_encoding() {
        let frame = RespFrame::BulkString(Bytes::from_static(b"hello"));
        assert_eq!(frame.encode_to_vec(), b"$5\r\nhello\r\n");
    }

    #[test]
    fn encodes_null_and_null_array() {
        assert_eq!(RespFrame::Null.encode_to_vec(), b"$-1\r\n");
        assert_eq!(RespFrame::NullArray.encode_to_vec(), b"*-1\r\n");
    }
}
