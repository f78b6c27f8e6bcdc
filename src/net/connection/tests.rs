use super::*;
use crate::client::ClientRegistry;
use crate::store::Store;
use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};
use tokio::sync::{broadcast, Semaphore};

fn setup() -> (Arc<Store>, Arc<ClientRegistry>, Arc<Semaphore>, Shutdown) {
    (
        Arc::new(Store::new(16)),
        Arc::new(ClientRegistry::new()),
        Arc::new(Semaphore::new(10)),
        Shutdown::new(broadcast::channel::<()>(1).1),
    )
}

async fn roundtrip(client: &mut tokio::io::DuplexStream, command: &[u8]) -> Vec<u8> {
    client.write_all(command).await.unwrap();
    let mut buf = vec![0u8; 256];
    let n = client.read(&mut buf).await.unwrap();
    buf.truncate(n);
    buf
}

#[tokio::test]
async fn ping_with_no_args_replies_pong() {
    let (store, clients, climit, shutdown) = setup();
    let (server, mut client) = duplex(4096);
    let mut handler = ConnectionHandler::new(server, store, clients, climit, shutdown);
    let task = tokio::spawn(async move { handler.run().await });

    assert_eq!(roundtrip(&mut client, b"*1\r\n$4\r\nPING\r\n").await, b"+PONG\r\n");
    assert_eq!(roundtrip(&mut client, b"*1\r\n$4\r\nQUIT\r\n").await, b"+OK\r\n");
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn set_then_get_round_trips_the_value() {
    let (store, clients, climit, shutdown) = setup();
    let (server, mut client) = duplex(4096);
    let mut handler = ConnectionHandler::new(server, store, clients, climit, shutdown);
    let task = tokio::spawn(async move { handler.run().await });

    let set = b"*3\r\n$3\r\nSET\r\n$3\r\nfoo\r\n$3\r\nbar\r\n";
    assert_eq!(roundtrip(&mut client, set).await, b"+OK\r\n");

    let get = b"*2\r\n$3\r\nGET\r\n$3\r\nfoo\r\n";
    assert_eq!(roundtrip(&mut client, get).await, b"$3\r\nbar\r\n");

    roundtrip(&mut client, b"*1\r\n$4\r\nQUIT\r\n").await;
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn append_twice_accumulates() {
    let (store, clients, climit, shutdown) = setup();
    let (server, mut client) = duplex(4096);
    let mut handler = ConnectionHandler::new(server, store, clients, climit, shutdown);
    let task = tokio::spawn(async move { handler.run().await });

    let append_a = b"*3\r\n$6\r\nAPPEND\r\n$1\r\nk\r\n$2\r\nhi\r\n";
    assert_eq!(roundtrip(&mut client, append_a).await, b":2\r\n");

    let append_b = b"*3\r\n$6\r\nAPPEND\r\n$1\r\nk\r\n$1\r\n!\r\n";
    assert_eq!(roundtrip(&mut client, append_b).await, b":3\r\n");

    let get = b"*2\r\n$3\r\nGET\r\n$1\r\nk\r\n";
    assert_eq!(roundtrip(&mut client, get).await, b"$3\r\nhi!\r\n");

    roundtrip(&mut client, b"*1\r\n$4\r\nQUIT\r\n").await;
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn incr_then_incrby() {
    let (store, clients, climit, shutdown) = setup();
    let (server, mut client) = duplex(4096);
    let mut handler = ConnectionHandler::new(server, store, clients, climit, shutdown);
    let task = tokio::spawn(async move { handler.run().await });

    let incr = b"*2\r\n$4\r\nINCR\r\n$1\r\nc\r\n";
    assert_eq!(roundtrip(&mut client, incr).await, b":1\r\n");

    let incrby = b"*3\r\n$6\r\nINCRBY\r\n$1\r\nc\r\n$2\r\n41\r\n";
    assert_eq!(roundtrip(&mut client, incrby).await, b":42\r\n");

    roundtrip(&mut client, b"*1\r\n$4\r\nQUIT\r\n").await;
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn incr_of_non_integer_value_is_an_error_and_the_connection_stays_usable() {
    let (store, clients, climit, shutdown) = setup();
    let (server, mut client) = duplex(4096);
    let mut handler = ConnectionHandler::new(server, store, clients, climit, shutdown);
    let task = tokio::spawn(async move { handler.run().await });

    let set = b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$5\r\nhello\r\n";
    assert_eq!(roundtrip(&mut client, set).await, b"+OK\r\n");

    let incr = b"*2\r\n$4\r\nINCR\r\n$1\r\nk\r\n";
    let reply = roundtrip(&mut client, incr).await;
    assert_eq!(
        reply,
        b"-cannot perform incr or decr operation on non-integer value\r\n".to_vec()
    );

    // the connection is still framed and usable after an application-level error
    assert_eq!(roundtrip(&mut client, b"*1\r\n$4\r\nPING\r\n").await, b"+PONG\r\n");

    roundtrip(&mut client, b"*1\r\n$4\r\nQUIT\r\n").await;
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn get_of_missing_key_is_null() {
    let (store, clients, climit, shutdown) = setup();
    let (server, mut client) = duplex(4096);
    let mut handler = ConnectionHandler::new(server, store, clients, climit, shutdown);
    let task = tokio::spawn(async move { handler.run().await });

    let get = b"*2\r\n$3\r\nGET\r\n$7\r\nmissing\r\n";
    assert_eq!(roundtrip(&mut client, get).await, b"$-1\r\n");

    roundtrip(&mut client, b"*1\r\n$4\r\nQUIT\r\n").await;
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn get_of_integer_value_replies_with_an_integer_not_a_bulk_string() {
    let (store, clients, climit, shutdown) = setup();
    let (server, mut client) = duplex(4096);
    let mut handler = ConnectionHandler::new(server, store, clients, climit, shutdown);
    let task = tokio::spawn(async move { handler.run().await });

    let incr = b"*2\r\n$4\r\nINCR\r\n$1\r\nc\r\n";
    assert_eq!(roundtrip(&mut client, incr).await, b":1\r\n");

    let get = b"*2\r\n$3\r\nGET\r\n$1\r\nc\r\n";
    assert_eq!(roundtrip(&mut client, get).await, b":1\r\n");

    roundtrip(&mut client, b"*1\r\n$4\r\nQUIT\r\n").await;
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn empty_envelope_is_a_protocol_error_and_the_connection_stays_usable() {
    let (store, clients, climit, shutdown) = setup();
    let (server, mut client) = duplex(4096);
    let mut handler = ConnectionHandler::new(server, store, clients, climit, shutdown);
    let task = tokio::spawn(async move { handler.run().await });

    let reply = roundtrip(&mut client, b"*0\r\n").await;
    assert!(reply.starts_with(b"-"), "expected an error reply, got {reply:?}");

    assert_eq!(roundtrip(&mut client, b"*1\r\n$4\r\nPING\r\n").await, b"+PONG\r\n");

    roundtrip(&mut client, b"*1\r\n$4\r\nQUIT\r\n").await;
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn append_with_null_value_writes_no_reply_at_all() {
    let (store, clients, climit, shutdown) = setup();
    let (server, mut client) = duplex(4096);
    let mut handler = ConnectionHandler::new(server, store, clients, climit, shutdown);
    let task = tokio::spawn(async move { handler.run().await });

    // APPEND k <null>, immediately followed by a PING: since APPEND writes no
    // reply at all, the first thing off the wire must be PONG
    let commands = b"*3\r\n$6\r\nAPPEND\r\n$1\r\nk\r\n$-1\r\n*1\r\n$4\r\nPING\r\n";
    assert_eq!(roundtrip(&mut client, commands).await, b"+PONG\r\n");

    roundtrip(&mut client, b"*1\r\n$4\r\nQUIT\r\n").await;
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn client_disconnect_releases_its_semaphore_permit() {
    let (store, clients, climit, shutdown) = setup();
    assert_eq!(climit.available_permits(), 10);
    // mirrors the accept loop: acquire and forget a permit before handing the
    // connection to its handler; the handler's Drop impl returns it
    Arc::clone(&climit).acquire_owned().await.unwrap().forget();
    assert_eq!(climit.available_permits(), 9);

    let (server, mut client) = duplex(4096);
    let mut handler = ConnectionHandler::new(server, store, clients, Arc::clone(&climit), shutdown);
    let task = tokio::spawn(async move { handler.run().await });
    roundtrip(&mut client, b"*1\r\n$4\r\nQUIT\r\n").await;
    task.await.unwrap().unwrap();
    assert_eq!(climit.available_permits(), 10);
}
