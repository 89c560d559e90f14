//! Server bootstrap tests
//!
//! Bind, serve HTTP and WebSocket subscribers, and shut down cleanly on
//! signal.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use telemetry_fanout::{ServerConfig, TelemetryError, TelemetryServer};

fn local_config(port: u16) -> ServerConfig {
    ServerConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port,
        tick_interval: Duration::from_millis(10),
        ..ServerConfig::default()
    }
}

async fn http_get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        path
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(addr: std::net::SocketAddr) -> Client {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
        .await
        .expect("Failed to connect to WebSocket");
    ws
}

/// Read text frames until one satisfies `matches`
async fn next_text_where(
    ws: &mut Client,
    matches: impl Fn(&serde_json::Value) -> bool,
) -> serde_json::Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("no frame within timeout")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            let json: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
            if matches(&json) {
                return json;
            }
        }
    }
}

async fn subscriber_count(addr: std::net::SocketAddr) -> u64 {
    let response = http_get(addr, "/api/status").await;
    let body = response.split("\r\n\r\n").nth(1).unwrap();
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    json["subscribers"].as_u64().unwrap()
}

async fn wait_for_subscribers(addr: std::net::SocketAddr, expected: u64) {
    for _ in 0..500 {
        if subscriber_count(addr).await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("subscriber count never reached {}", expected);
}

#[tokio::test]
async fn test_bind_conflict_is_reported() {
    let first = TelemetryServer::bind(local_config(0)).await.unwrap();
    let taken = first.local_addr().unwrap();

    let err = match TelemetryServer::bind(local_config(taken.port())).await {
        Ok(_) => panic!("second bind should fail"),
        Err(e) => e,
    };
    assert!(matches!(err, TelemetryError::Bind { addr, .. } if addr == taken));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_serves_until_shutdown_signal() {
    let server = TelemetryServer::bind(local_config(0)).await.unwrap();
    let addr = server.local_addr().unwrap();

    let (tx, rx) = oneshot::channel::<()>();
    let running = tokio::spawn(server.run(async move {
        let _ = rx.await;
    }));

    let health = http_get(addr, "/health").await;
    assert!(health.starts_with("HTTP/1.1 200"));
    assert!(health.ends_with("OK"));

    // Give the producer a few ticks
    tokio::time::sleep(Duration::from_millis(50)).await;
    let status = http_get(addr, "/api/status").await;
    assert!(status.contains("\"running\":true"));
    assert!(status.contains("\"subscribers\":0"));

    tx.send(()).unwrap();
    let outcome = tokio::time::timeout(Duration::from_secs(5), running)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(outcome.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_websocket_subscriber_lifecycle() {
    let server = TelemetryServer::bind(local_config(0)).await.unwrap();
    let addr = server.local_addr().unwrap();

    let (tx, rx) = oneshot::channel::<()>();
    let running = tokio::spawn(server.run(async move {
        let _ = rx.await;
    }));

    // Snapshots arrive once registered
    let mut first = connect(addr).await;
    let snapshot = next_text_where(&mut first, |json| json.get("tick").is_some()).await;
    assert!(snapshot["tick"].as_u64().unwrap() >= 1);
    assert!(snapshot["users"].is_array());
    assert!(snapshot["capturedAtMs"].is_i64());
    wait_for_subscribers(addr, 1).await;

    // Application-level ping among the snapshot stream
    first
        .send(Message::text(r#"{"type":"ping"}"#))
        .await
        .unwrap();
    let pong = next_text_where(&mut first, |json| json["type"] == "pong").await;
    assert_eq!(pong, serde_json::json!({"type": "pong"}));

    // Closing unregisters
    first.close(None).await.unwrap();
    wait_for_subscribers(addr, 0).await;

    // Shutdown closes remaining subscribers
    let mut second = connect(addr).await;
    next_text_where(&mut second, |json| json.get("tick").is_some()).await;
    tx.send(()).unwrap();

    let closed = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(msg) = second.next().await {
            match msg {
                Ok(Message::Close(_)) => return true,
                Ok(_) => continue,
                Err(_) => return false,
            }
        }
        false
    })
    .await
    .expect("no close frame within timeout");
    assert!(closed);

    let outcome = tokio::time::timeout(Duration::from_secs(5), running)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(outcome.is_ok());
}
