// tests/integration/transaction_test.rs

use super::test_helpers::TestServer;

#[tokio::test]
async fn multi_queues_and_exec_runs_in_order() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["MULTI"]).await;
    assert_eq!(client.read_reply().await, "+OK\r\n");

    client.send(&["SET", "k", "v"]).await;
    assert_eq!(client.read_reply().await, "+QUEUED\r\n");

    client.send(&["INCR", "counter"]).await;
    assert_eq!(client.read_reply().await, "+QUEUED\r\n");

    client.send(&["EXEC"]).await;
    assert_eq!(client.read_reply().await, "*2\r\n+OK\r\n:1\r\n");

    client.send(&["GET", "k"]).await;
    assert_eq!(client.read_reply().await, "$1\r\nv\r\n");
}

#[tokio::test]
async fn discard_drops_queued_commands() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["MULTI"]).await;
    client.read_reply().await;

    client.send(&["SET", "k", "v"]).await;
    client.read_reply().await;

    client.send(&["DISCARD"]).await;
    assert_eq!(client.read_reply().await, "+OK\r\n");

    client.send(&["GET", "k"]).await;
    assert_eq!(client.read_reply().await, "$-1\r\n");
}

#[tokio::test]
async fn exec_without_multi_is_an_error() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["EXEC"]).await;
    let reply = client.read_reply().await;
    assert!(reply.starts_with(b"-ERR"), "got {reply:?}");
}

#[tokio::test]
async fn unknown_command_is_queued_raw_and_only_errors_at_exec() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["MULTI"]).await;
    client.read_reply().await;

    client.send(&["SET", "k", "v"]).await;
    assert_eq!(client.read_reply().await, "+QUEUED\r\n");

    // Unknown command: must still be queued, not rejected immediately.
    client.send(&["NOTACOMMAND", "x"]).await;
    assert_eq!(client.read_reply().await, "+QUEUED\r\n");

    // Wrong arity for a known command: same deal.
    client.send(&["GET"]).await;
    assert_eq!(client.read_reply().await, "+QUEUED\r\n");

    client.send(&["EXEC"]).await;
    let reply = client.read_reply().await;
    assert!(reply.starts_with(b"*3\r\n+OK\r\n-ERR"), "got {reply:?}");

    // The transaction is over and the valid command inside it still ran.
    client.send(&["GET", "k"]).await;
    assert_eq!(client.read_reply().await, "$1\r\nv\r\n");
}

#[tokio::test]
async fn nested_multi_is_an_error() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["MULTI"]).await;
    client.read_reply().await;

    client.send(&["MULTI"]).await;
    let reply = client.read_reply().await;
    assert!(reply.starts_with(b"-ERR"), "got {reply:?}");

    client.send(&["DISCARD"]).await;
    client.read_reply().await;
}
