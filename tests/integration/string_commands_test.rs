// tests/integration/string_commands_test.rs

use super::test_helpers::TestServer;

#[tokio::test]
async fn ping_and_echo() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["PING"]).await;
    assert_eq!(client.read_reply().await, "+PONG\r\n");

    client.send(&["ECHO", "hello"]).await;
    assert_eq!(client.read_reply().await, "$5\r\nhello\r\n");
}

#[tokio::test]
async fn set_get_roundtrip() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["SET", "greeting", "hi"]).await;
    assert_eq!(client.read_reply().await, "+OK\r\n");

    client.send(&["GET", "greeting"]).await;
    assert_eq!(client.read_reply().await, "$2\r\nhi\r\n");

    client.send(&["GET", "missing"]).await;
    assert_eq!(client.read_reply().await, "$-1\r\n");
}

#[tokio::test]
async fn set_with_px_expires() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["SET", "transient", "x", "PX", "20"]).await;
    assert_eq!(client.read_reply().await, "+OK\r\n");

    client.send(&["GET", "transient"]).await;
    assert_eq!(client.read_reply().await, "$1\r\nx\r\n");

    tokio::time::sleep(std::time::Duration::from_millis(60)).await;

    client.send(&["GET", "transient"]).await;
    assert_eq!(client.read_reply().await, "$-1\r\n");
}

#[tokio::test]
async fn incr_rejects_non_integer() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["SET", "counter", "notanumber"]).await;
    assert_eq!(client.read_reply().await, "+OK\r\n");

    client.send(&["INCR", "counter"]).await;
    let reply = client.read_reply().await;
    assert!(reply.starts_with(b"-ERR"), "expected an error reply, got {reply:?}");
}

#[tokio::test]
async fn type_reports_string_list_and_none() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["SET", "s", "v"]).await;
    client.read_reply().await;
    client.send(&["TYPE", "s"]).await;
    assert_eq!(client.read_reply().await, "+string\r\n");

    client.send(&["LPUSH", "l", "v"]).await;
    client.read_reply().await;
    client.send(&["TYPE", "l"]).await;
    assert_eq!(client.read_reply().await, "+list\r\n");

    client.send(&["TYPE", "nope"]).await;
    assert_eq!(client.read_reply().await, "+none\r\n");
}

#[tokio::test]
async fn wrongtype_error_on_cross_type_access() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["LPUSH", "alist", "v"]).await;
    client.read_reply().await;

    client.send(&["GET", "alist"]).await;
    let reply = client.read_reply().await;
    assert!(reply.starts_with(b"-WRONGTYPE"), "got {reply:?}");
}
