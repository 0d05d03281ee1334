// tests/integration/test_helpers.rs

//! Spawns a real server on a free TCP port and hands back a connected
//! socket, so integration tests exercise the exact bytes a client would
//! send and receive.

use basaltdb::config::Config;
use bytes::{Bytes, BytesMut};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

static NEXT_PORT: AtomicU16 = AtomicU16::new(0);

/// Picks a probably-free port in the high ephemeral range, offset by an
/// atomic counter so concurrently-running tests don't collide.
fn next_port() -> u16 {
    let offset = NEXT_PORT.fetch_add(1, Ordering::Relaxed);
    20000 + offset
}

pub struct TestServer {
    pub port: u16,
}

impl TestServer {
    /// Starts a standalone primary on a fresh port.
    pub async fn start() -> Self {
        let port = next_port();
        let config = Config {
            port,
            ..Config::default()
        };
        tokio::spawn(async move {
            let _ = basaltdb::server::run(config).await;
        });
        wait_until_listening(port).await;
        Self { port }
    }

    /// Starts a replica pointed at `primary_port`.
    pub async fn start_replica(primary_port: u16) -> Self {
        let port = next_port();
        let config = Config {
            port,
            replicaof: basaltdb::config::ReplicaOf::Primary {
                host: "127.0.0.1".to_string(),
                port: primary_port,
            },
        };
        tokio::spawn(async move {
            let _ = basaltdb::server::run(config).await;
        });
        wait_until_listening(port).await;
        Self { port }
    }

    pub async fn connect(&self) -> TestClient {
        let stream = TcpStream::connect(("127.0.0.1", self.port))
            .await
            .expect("failed to connect to test server");
        TestClient {
            stream,
            buf: BytesMut::new(),
        }
    }
}

async fn wait_until_listening(port: u16) {
    for _ in 0..100 {
        if TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server on port {port} never started listening");
}

/// A minimal hand-rolled RESP2 client: encodes a command array, reads back
/// exactly one reply line/frame as raw bytes.
pub struct TestClient {
    stream: TcpStream,
    buf: BytesMut,
}

impl TestClient {
    pub async fn send(&mut self, args: &[&str]) {
        let mut out = format!("*{}\r\n", args.len());
        for arg in args {
            out.push_str(&format!("${}\r\n{}\r\n", arg.len(), arg));
        }
        self.stream.write_all(out.as_bytes()).await.unwrap();
    }

    /// Reads one complete reply off the wire, returning the raw bytes
    /// (including the type prefix and trailing CRLF(s) for aggregates).
    pub async fn read_reply(&mut self) -> Bytes {
        loop {
            if let Some(frame_len) = complete_frame_len(&self.buf) {
                let frame = self.buf.split_to(frame_len).freeze();
                return frame;
            }
            let mut chunk = [0u8; 4096];
            let n = self.stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "server closed connection unexpectedly");
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }
}

/// Scans `buf` for one complete RESP frame, returning its byte length if
/// fully present. Reimplemented independently of the production decoder so
/// a codec bug can't hide itself from these tests.
fn complete_frame_len(buf: &[u8]) -> Option<usize> {
    fn line_len(buf: &[u8], from: usize) -> Option<usize> {
        buf[from..].windows(2).position(|w| w == b"\r\n").map(|p| p + 2)
    }

    fn frame_len(buf: &[u8], from: usize) -> Option<usize> {
        if from >= buf.len() {
            return None;
        }
        match buf[from] {
            b'+' | b'-' | b':' => line_len(buf, from + 1).map(|l| 1 + l),
            b'$' => {
                let header = line_len(buf, from + 1)?;
                let len_str = std::str::from_utf8(&buf[from + 1..from + header - 2]).ok()?;
                let len: i64 = len_str.parse().ok()?;
                if len == -1 {
                    return Some(1 + header);
                }
                let total = 1 + header + len as usize + 2;
                if buf.len() >= from + total { Some(total) } else { None }
            }
            b'*' => {
                let header = line_len(buf, from + 1)?;
                let count_str = std::str::from_utf8(&buf[from + 1..from + header - 2]).ok()?;
                let count: i64 = count_str.parse().ok()?;
                if count == -1 {
                    return Some(1 + header);
                }
                let mut offset = from + 1 + header;
                for _ in 0..count {
                    let item_len = frame_len(buf, offset)?;
                    offset += item_len;
                }
                Some(offset - from)
            }
            _ => None,
        }
    }

    frame_len(buf, 0)
}
