use futures::future::join_all;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, Duration};

use tinydis::config::Config;
use tinydis::server::serve;

async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(serve(listener, Config::default()));

    addr
}

/// Encodes a command the way a client would: an array of bulk strings.
fn encode(parts: &[&str]) -> Vec<u8> {
    let mut bytes = format!("*{}\r\n", parts.len()).into_bytes();
    for part in parts {
        bytes.extend_from_slice(format!("${}\r\n{}\r\n", part.len(), part).as_bytes());
    }
    bytes
}

struct Client {
    stream: TcpStream,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Client {
        let stream = TcpStream::connect(addr).await.unwrap();
        Client { stream }
    }

    /// Reads one single-line reply.
    async fn read_reply(&mut self) -> String {
        let mut reply = vec![];
        while !reply.ends_with(b"\r\n") {
            let byte = self.stream.read_u8().await.unwrap();
            reply.push(byte);
        }
        String::from_utf8(reply).unwrap()
    }

    async fn send_raw(&mut self, bytes: &[u8]) -> String {
        self.stream.write_all(bytes).await.unwrap();
        self.read_reply().await
    }

    async fn cmd(&mut self, parts: &[&str]) -> String {
        self.send_raw(&encode(parts)).await
    }
}

#[tokio::test]
async fn test_set_and_get_keep_inferred_type() {
    let addr = start_server().await;
    let mut client = Client::connect(addr).await;

    let cases = [
        ("int", "5", ":5\r\n"),
        ("double", "5.4", ",5.4\r\n"),
        ("true", "true", "#t\r\n"),
        ("false", "false", "#f\r\n"),
        ("string", "hello", "+hello\r\n"),
    ];

    for (key, value, expected) in cases {
        assert_eq!(client.cmd(&["SET", key, value]).await, "+OK\r\n");
        assert_eq!(client.cmd(&["GET", key]).await, expected);
    }

    assert_eq!(client.cmd(&["GET", "nonexistent"]).await, "_\r\n");
}

#[tokio::test]
async fn test_numbers_read_back_as_written() {
    let addr = start_server().await;
    let mut client = Client::connect(addr).await;

    let cases = [
        ("padded", "5.40", ",5.40\r\n"),
        ("leading_zeros", "007", ":007\r\n"),
        ("signed", "+7", ":+7\r\n"),
        ("exponent", "1e3", ",1e3\r\n"),
        ("huge", "99999999999999999999", ",99999999999999999999\r\n"),
    ];

    for (key, value, expected) in cases {
        assert_eq!(client.cmd(&["SET", key, value]).await, "+OK\r\n");
        assert_eq!(client.cmd(&["GET", key]).await, expected);
    }

    // INCR works on the parsed value and stores the result in canonical form.
    assert_eq!(client.cmd(&["INCR", "leading_zeros"]).await, "+OK\r\n");
    assert_eq!(client.cmd(&["GET", "leading_zeros"]).await, ":8\r\n");
}

#[tokio::test]
async fn test_oversized_bulk_length_keeps_connection_open() {
    let addr = start_server().await;
    let mut client = Client::connect(addr).await;

    let reply = client
        .send_raw(b"*2\r\n$3\r\nGET\r\n$18446744073709551579\r\nabc")
        .await;
    assert!(reply.starts_with("-ERR protocol error;"), "{}", reply);

    assert_eq!(client.cmd(&["PING"]).await, "+PONG\r\n");
}

#[tokio::test]
async fn test_incr() {
    let addr = start_server().await;
    let mut client = Client::connect(addr).await;

    assert_eq!(client.cmd(&["INCR", "fresh"]).await, "+OK\r\n");
    assert_eq!(client.cmd(&["GET", "fresh"]).await, ":1\r\n");

    assert_eq!(client.cmd(&["SET", "counter", "99"]).await, "+OK\r\n");
    for _ in 0..5 {
        assert_eq!(client.cmd(&["INCR", "counter"]).await, "+OK\r\n");
    }
    assert_eq!(client.cmd(&["GET", "counter"]).await, ":104\r\n");
}

#[tokio::test]
async fn test_incr_wrong_type() {
    let addr = start_server().await;
    let mut client = Client::connect(addr).await;

    client.cmd(&["SET", "word", "hello"]).await;

    let reply = client.cmd(&["INCR", "word"]).await;
    assert!(reply.starts_with("-ERR WRONGTYPE"), "{}", reply);

    assert_eq!(client.cmd(&["GET", "word"]).await, "+hello\r\n");
}

#[tokio::test]
async fn test_del() {
    let addr = start_server().await;
    let mut client = Client::connect(addr).await;

    assert_eq!(client.cmd(&["DEL", "missing"]).await, ":0\r\n");
    assert_eq!(client.cmd(&["DEL", "missing"]).await, ":0\r\n");

    client.cmd(&["SET", "a", "1"]).await;
    client.cmd(&["SET", "c", "3"]).await;

    assert_eq!(client.cmd(&["DEL", "a", "b", "c"]).await, ":2\r\n");

    assert_eq!(client.cmd(&["GET", "a"]).await, "_\r\n");
    assert_eq!(client.cmd(&["GET", "b"]).await, "_\r\n");
    assert_eq!(client.cmd(&["GET", "c"]).await, "_\r\n");
}

#[tokio::test]
async fn test_errors_keep_connection_open() {
    let addr = start_server().await;
    let mut client = Client::connect(addr).await;

    assert_eq!(
        client.cmd(&["SETI", "k", "v"]).await,
        "-ERR unknown command 'SETI'\r\n"
    );
    assert_eq!(
        client.cmd(&["GET"]).await,
        "-ERR wrong number of arguments for 'GET' command\r\n"
    );
    assert_eq!(
        client.cmd(&["SET", "k"]).await,
        "-ERR wrong number of arguments for 'SET' command\r\n"
    );
    assert_eq!(
        client.cmd(&["INCR", "k", "extra"]).await,
        "-ERR wrong number of arguments for 'INCR' command\r\n"
    );

    let reply = client.send_raw(b"$3\r\nGET\r\n").await;
    assert!(reply.starts_with("-ERR protocol error;"), "{}", reply);

    let reply = client
        .send_raw(b"*2\r\n$3\r\nGET\r\n$9\r\nkey\r\n$1\r\nx\r\n")
        .await;
    assert!(reply.starts_with("-ERR protocol error;"), "{}", reply);

    assert_eq!(client.cmd(&["PING"]).await, "+PONG\r\n");
}

#[tokio::test]
async fn test_segmented_request() {
    let addr = start_server().await;
    let mut client = Client::connect(addr).await;

    let bytes = encode(&["SET", "segmented", "value"]);
    for chunk in bytes.chunks(3) {
        client.stream.write_all(chunk).await.unwrap();
        client.stream.flush().await.unwrap();
        sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(client.read_reply().await, "+OK\r\n");

    assert_eq!(client.cmd(&["GET", "segmented"]).await, "+value\r\n");
}

#[tokio::test]
async fn test_pipelined_requests() {
    let addr = start_server().await;
    let mut client = Client::connect(addr).await;

    let mut bytes = encode(&["SET", "p", "1"]);
    bytes.extend(encode(&["INCR", "p"]));
    bytes.extend(encode(&["GET", "p"]));
    client.stream.write_all(&bytes).await.unwrap();

    assert_eq!(client.read_reply().await, "+OK\r\n");
    assert_eq!(client.read_reply().await, "+OK\r\n");
    assert_eq!(client.read_reply().await, ":2\r\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_incr_from_many_connections() {
    let addr = start_server().await;

    let tasks = (0..100).map(|_| {
        tokio::spawn(async move {
            let mut client = Client::connect(addr).await;
            client.cmd(&["INCR", "shared"]).await
        })
    });

    for reply in join_all(tasks).await {
        assert_eq!(reply.unwrap(), "+OK\r\n");
    }

    let mut client = Client::connect(addr).await;
    assert_eq!(client.cmd(&["GET", "shared"]).await, ":100\r\n");
}

#[tokio::test]
async fn test_clients_share_one_store() {
    let addr = start_server().await;
    let mut writer = Client::connect(addr).await;
    let mut reader = Client::connect(addr).await;

    writer.cmd(&["SET", "shared", "2.5"]).await;

    assert_eq!(reader.cmd(&["GET", "shared"]).await, ",2.5\r\n");
}
