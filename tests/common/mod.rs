//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use spyglass::config::SpyglassConfig;
use spyglass::{Shutdown, SpyglassServer};

/// Every raw request a mock backend has received, in arrival order.
pub type Received = Arc<Mutex<Vec<Vec<u8>>>>;

/// Read one HTTP/1.1 request: headers up to the blank line, then
/// `Content-Length` bytes of body.
async fn read_request(socket: &mut TcpStream) -> Vec<u8> {
    let mut received = Vec::new();
    let mut buf = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = received.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut buf).await.unwrap_or(0);
        if n == 0 {
            return received;
        }
        received.extend_from_slice(&buf[..n]);
    };

    let head = String::from_utf8_lossy(&received[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("Content-Length: "))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while received.len() < header_end + content_length {
        let n = socket.read(&mut buf).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        received.extend_from_slice(&buf[..n]);
    }
    received
}

/// Start a backend that records each request and answers `200 OK` with `body`.
pub async fn start_recording_backend(body: &'static str) -> (SocketAddr, Received) {
    start_flaky_backend(0, body).await
}

/// Like [`start_recording_backend`], but the first `drop_first` connections
/// are closed without a response.
pub async fn start_flaky_backend(drop_first: u32, body: &'static str) -> (SocketAddr, Received) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let connections = Arc::new(AtomicU32::new(0));

    let log = received.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let log = log.clone();
                    let seen = connections.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(async move {
                        let request = read_request(&mut socket).await;
                        log.lock().unwrap().push(request);
                        if seen < drop_first {
                            let _ = socket.shutdown().await;
                            return;
                        }
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, received)
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Config with short deadlines and near-zero backoff.
pub fn test_config() -> SpyglassConfig {
    let mut config = SpyglassConfig::default();
    config.transport.connect_timeout_ms = 500;
    config.transport.request_timeout_ms = 2_000;
    config.transport.read_idle_ms = 100;
    config.retries.base_delay_ms = 1;
    config.retries.max_delay_ms = 5;
    config
}

/// Serve the API on an ephemeral port. Returns its base URL.
pub async fn start_server(config: SpyglassConfig, shutdown: &Shutdown) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = SpyglassServer::new(config);
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });
    format!("http://{}", addr)
}

/// HTTP client that ignores proxy environment variables.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
