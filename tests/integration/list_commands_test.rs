// tests/integration/list_commands_test.rs

use super::test_helpers::TestServer;

#[tokio::test]
async fn push_pop_and_range() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["RPUSH", "mylist", "a", "b", "c"]).await;
    assert_eq!(client.read_reply().await, ":3\r\n");

    client.send(&["LLEN", "mylist"]).await;
    assert_eq!(client.read_reply().await, ":3\r\n");

    client.send(&["LRANGE", "mylist", "0", "-1"]).await;
    assert_eq!(
        client.read_reply().await,
        "*3\r\n$1\r\na\r\n$1\r\nb\r\n$1\r\nc\r\n"
    );

    client.send(&["LPOP", "mylist"]).await;
    assert_eq!(client.read_reply().await, "$1\r\na\r\n");

    client.send(&["LPOP", "mylist", "2"]).await;
    assert_eq!(client.read_reply().await, "*2\r\n$1\r\nb\r\n$1\r\nc\r\n");

    client.send(&["LPOP", "mylist"]).await;
    assert_eq!(client.read_reply().await, "$-1\r\n");
}

#[tokio::test]
async fn lpop_with_count_on_missing_key_is_null_array() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["LPOP", "nosuchlist", "3"]).await;
    assert_eq!(client.read_reply().await, "*-1\r\n");
}

#[tokio::test]
async fn lpush_prepends_in_reverse_arg_order() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send(&["LPUSH", "k", "a", "b", "c"]).await;
    client.read_reply().await;

    client.send(&["LRANGE", "k", "0", "-1"]).await;
    assert_eq!(
        client.read_reply().await,
        "*3\r\n$1\r\nc\r\n$1\r\nb\r\n$1\r\na\r\n"
    );
}
