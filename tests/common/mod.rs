//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use aogo_client::blockchain::{ChainClient, ProgramAddresses, TxBuilder};
use aogo_client::claims::ClaimServiceClient;
use aogo_client::config::{ClaimServiceConfig, ClusterConfig};
use solana_sdk::pubkey::Pubkey;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: String,
    pub target: String,
    pub body: String,
}

/// Read one HTTP/1.1 request (head plus Content-Length body).
async fn read_request(socket: &mut TcpStream) -> Option<MockRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    Some(MockRequest {
        method: request_line.next().unwrap_or_default().to_string(),
        target: request_line.next().unwrap_or_default().to_string(),
        body: String::from_utf8_lossy(&buf[head_end..]).to_string(),
    })
}

async fn respond(socket: &mut TcpStream, status: u16, body: &str) {
    let status_text = match status {
        200 => "200 OK",
        400 => "400 Bad Request",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\
         Connection: close\r\n\r\n{}",
        status_text,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
    tokio::time::sleep(Duration::from_millis(10)).await;
}

/// Start a mock backend on an ephemeral port that returns a fixed JSON body.
pub async fn start_mock_backend(status: u16, body: String) -> SocketAddr {
    let body = Arc::new(body);
    start_programmable_backend(move |_| {
        let body = body.clone();
        async move { (status, body.to_string()) }
    })
    .await
}

/// Start a programmable mock backend on an ephemeral port.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(MockRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        if let Some(request) = read_request(&mut socket).await {
                            let (status, body) = f(request).await;
                            respond(&mut socket, status, &body).await;
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Claim service client pointed at a local mock.
pub fn service_client(addr: SocketAddr) -> ClaimServiceClient {
    ClaimServiceClient::new(&ClaimServiceConfig {
        api_domain: format!("http://{}", addr),
        request_timeout_secs: 5,
    })
    .unwrap()
}

/// Transaction builder whose RPC endpoint is `addr`.
pub fn tx_builder(addr: SocketAddr) -> TxBuilder {
    let client = ChainClient::new(ClusterConfig {
        rpc_url: format!("http://{}", addr),
        rpc_timeout_secs: 5,
        confirmation_timeout_secs: 2,
        confirmation_poll_ms: 100,
        ..Default::default()
    })
    .unwrap();
    TxBuilder::new(client, ProgramAddresses::new(Pubkey::new_unique()))
}

/// JSON-RPC success envelope.
pub fn rpc_result(result: serde_json::Value) -> String {
    serde_json::json!({ "jsonrpc": "2.0", "result": result, "id": 1 }).to_string()
}

/// JSON-RPC error envelope.
pub fn rpc_error(code: i64, message: &str) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "error": { "code": code, "message": message },
        "id": 1
    })
    .to_string()
}
