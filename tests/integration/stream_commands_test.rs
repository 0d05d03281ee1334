// tests/integration/stream_commands_test.rs

use super::test_helpers::TestServer;

#[tokio::test]
async fn xadd_assigns_explicit_id_and_xrange_finds_it() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client
        .send(&["XADD", "events", "1-1", "field", "value"])
        .await;
    assert_eq!(client.read_reply().await, "$3\r\n1-1\r\n");

    client.send(&["XRANGE", "events", "-", "+"]).await;
    assert_eq!(
        client.read_reply().await,
        "*1\r\n*2\r\n$3\r\n1-1\r\n*2\r\n$5\r\nfield\r\n$5\r\nvalue\r\n"
    );
}

#[tokio::test]
async fn xadd_rejects_non_increasing_id() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["XADD", "events", "5-0", "a", "1"]).await;
    client.read_reply().await;

    client.send(&["XADD", "events", "5-0", "a", "2"]).await;
    let reply = client.read_reply().await;
    assert!(reply.starts_with(b"-ERR"), "got {reply:?}");
}

#[tokio::test]
async fn xadd_partial_auto_id_assigns_next_sequence_at_given_millis() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["XADD", "events", "5-0", "a", "1"]).await;
    assert_eq!(client.read_reply().await, "$3\r\n5-0\r\n");

    client.send(&["XADD", "events", "5-*", "a", "2"]).await;
    assert_eq!(client.read_reply().await, "$3\r\n5-1\r\n");
}

#[tokio::test]
async fn xrange_bare_millis_end_includes_every_sequence_at_that_millisecond() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["XADD", "events2", "5-0", "a", "1"]).await;
    client.read_reply().await;
    client.send(&["XADD", "events2", "5-1", "a", "2"]).await;
    client.read_reply().await;

    client.send(&["XRANGE", "events2", "-", "5"]).await;
    assert_eq!(
        client.read_reply().await,
        "*2\r\n\
         *2\r\n$3\r\n5-0\r\n*2\r\n$1\r\na\r\n$1\r\n1\r\n\
         *2\r\n$3\r\n5-1\r\n*2\r\n$1\r\na\r\n$1\r\n2\r\n"
    );
}

#[tokio::test]
async fn xread_dollar_only_sees_future_entries() {
    let server = TestServer::start().await;
    let mut writer = server.connect().await;
    let mut reader = server.connect().await;

    writer.send(&["XADD", "s", "1-1", "a", "1"]).await;
    writer.read_reply().await;

    reader
        .send(&["XREAD", "STREAMS", "s", "$"])
        .await;

    writer.send(&["XADD", "s", "2-1", "b", "2"]).await;
    writer.read_reply().await;

    let reply = reader.read_reply().await;
    assert_eq!(
        reply,
        "*1\r\n*2\r\n$1\r\ns\r\n*1\r\n*2\r\n$3\r\n2-1\r\n*2\r\n$1\r\nb\r\n$1\r\n2\r\n"
    );
}
