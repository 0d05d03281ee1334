// tests/integration/blocking_test.rs

use super::test_helpers::TestServer;
use std::time::Duration;

#[tokio::test]
async fn blpop_returns_immediately_when_key_already_present() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["RPUSH", "q", "first"]).await;
    client.read_reply().await;

    client.send(&["BLPOP", "q", "1"]).await;
    assert_eq!(
        client.read_reply().await,
        "*2\r\n$1\r\nq\r\n$5\r\nfirst\r\n"
    );
}

#[tokio::test]
async fn blpop_wakes_up_when_another_connection_pushes() {
    let server = TestServer::start().await;
    let mut blocker = server.connect().await;
    let mut pusher = server.connect().await;

    blocker.send(&["BLPOP", "q", "5"]).await;

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        pusher.send(&["RPUSH", "q", "later"]).await;
        pusher.read_reply().await;
    });

    let reply = blocker.read_reply().await;
    assert_eq!(reply, "*2\r\n$1\r\nq\r\n$5\r\nlater\r\n");
}

#[tokio::test]
async fn blpop_times_out_to_null_array() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["BLPOP", "nosuchqueue", "1"]).await;
    let reply = client.read_reply().await;
    assert_eq!(reply, "*-1\r\n");
}

#[tokio::test]
async fn blpop_accepts_fractional_second_timeout() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    let start = tokio::time::Instant::now();
    client.send(&["BLPOP", "nosuchqueue", "0.1"]).await;
    let reply = client.read_reply().await;
    let elapsed = start.elapsed();

    assert_eq!(reply, "*-1\r\n");
    assert!(
        elapsed < Duration::from_secs(1),
        "expected a sub-second timeout, waited {elapsed:?}"
    );
}

#[tokio::test]
async fn xread_block_wakes_up_on_new_entry() {
    let server = TestServer::start().await;
    let mut reader = server.connect().await;
    let mut writer = server.connect().await;

    reader
        .send(&["XREAD", "BLOCK", "5000", "STREAMS", "s", "$"])
        .await;

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        writer.send(&["XADD", "s", "1-1", "a", "1"]).await;
        writer.read_reply().await;
    });

    let reply = reader.read_reply().await;
    assert_eq!(
        reply,
        "*1\r\n*2\r\n$1\r\ns\r\n*1\r\n*2\r\n$3\r\n1-1\r\n*2\r\n$1\r\na\r\n$1\r\n1\r\n"
    );
}
