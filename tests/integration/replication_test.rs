// tests/integration/replication_test.rs

use super::test_helpers::TestServer;
use std::time::Duration;

#[tokio::test]
async fn write_on_primary_propagates_to_replica() {
    let primary = TestServer::start().await;
    let replica = TestServer::start_replica(primary.port).await;

    let mut primary_client = primary.connect().await;
    primary_client.send(&["SET", "k", "v"]).await;
    assert_eq!(primary_client.read_reply().await, "+OK\r\n");

    let mut replica_client = replica.connect().await;
    let mut seen = None;
    for _ in 0..50 {
        replica_client.send(&["GET", "k"]).await;
        let reply = replica_client.read_reply().await;
        if reply == "$1\r\nv\r\n" {
            seen = Some(reply);
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(seen, Some(bytes::Bytes::from_static(b"$1\r\nv\r\n")));
}

#[tokio::test]
async fn replica_applies_list_writes_propagated_from_primary() {
    let primary = TestServer::start().await;
    let replica = TestServer::start_replica(primary.port).await;

    let mut primary_client = primary.connect().await;
    primary_client.send(&["RPUSH", "q", "a", "b"]).await;
    primary_client.read_reply().await;

    let mut replica_client = replica.connect().await;
    let mut matched = false;
    for _ in 0..50 {
        replica_client.send(&["LRANGE", "q", "0", "-1"]).await;
        let reply = replica_client.read_reply().await;
        if reply == "*2\r\n$1\r\na\r\n$1\r\nb\r\n" {
            matched = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(matched, "replica never observed the propagated RPUSH");
}
