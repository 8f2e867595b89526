//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::Response;
use axum::Router;
use futures_util::StreamExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use employee_gateway::config::Config;
use employee_gateway::employees::{EmployeeStore, MemoryStore};
use employee_gateway::{GatewayServer, ServiceServer, Shutdown};

/// What a mock function saw for one request.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body_len: usize,
    pub chunks: usize,
}

/// Canned reply of a mock function.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: &'static str,
    pub delay: Duration,
}

impl Default for MockReply {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: Vec::new(),
            body: "ok",
            delay: Duration::ZERO,
        }
    }
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    calls: Arc<Mutex<Vec<Recorded>>>,
}

/// A remote function stand-in that records every request it receives.
pub struct MockFunction {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<Recorded>>>,
}

impl MockFunction {
    pub async fn start(reply: MockReply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            reply,
            calls: calls.clone(),
        };

        let app = Router::new().fallback(record).with_state(state);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, calls }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }
}

async fn record(State(state): State<MockState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let mut body_len = 0;
    let mut chunks = 0;
    let mut stream = body.into_data_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.unwrap();
        body_len += chunk.len();
        chunks += 1;
    }

    state.calls.lock().unwrap().push(Recorded {
        method: parts.method,
        path: parts.uri.path().to_string(),
        headers: parts.headers,
        body_len,
        chunks,
    });

    if !state.reply.delay.is_zero() {
        tokio::time::sleep(state.reply.delay).await;
    }

    let mut response = Response::new(Body::from(state.reply.body));
    *response.status_mut() = state.reply.status;
    for &(name, value) in &state.reply.headers {
        response.headers_mut().append(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    response
}

/// Read one request head off a raw connection.
async fn read_head(socket: &mut TcpStream) -> std::io::Result<()> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }
        head.extend_from_slice(&buf[..n]);
    }
    Ok(())
}

/// A remote that announces `declared` body bytes, sends `sent`, then hangs up.
pub async fn truncating_function(declared: usize, sent: usize) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            if read_head(&mut socket).await.is_err() {
                continue;
            }
            let head = format!("HTTP/1.1 200 OK\r\ncontent-length: {}\r\n\r\n", declared);
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(&vec![b'x'; sent]).await;
            let _ = socket.flush().await;
            // Dropping the socket ends the body early.
        }
    });

    addr
}

/// A remote that accepts one request and never answers.
pub struct StalledFunction {
    pub addr: SocketAddr,
    /// Fires once the request head has arrived.
    pub received: oneshot::Receiver<()>,
    /// Fires once the caller side of the connection is closed.
    pub closed: oneshot::Receiver<()>,
}

impl StalledFunction {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (received_tx, received) = oneshot::channel();
        let (closed_tx, closed) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            if read_head(&mut socket).await.is_ok() {
                let _ = received_tx.send(());
            }
            let mut buf = [0u8; 1024];
            loop {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
            }
            let _ = closed_tx.send(());
        });

        Self {
            addr,
            received,
            closed,
        }
    }
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Start the gateway on an ephemeral port.
pub async fn start_gateway(config: Config) -> (SocketAddr, Shutdown) {
    let server = GatewayServer::new(&config).expect("gateway builds");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Start the employee service on an ephemeral port with an empty store.
pub async fn start_service(config: Config) -> (SocketAddr, Shutdown) {
    let store: Arc<dyn EmployeeStore> = Arc::new(MemoryStore::new("employees"));
    let server = ServiceServer::new(&config, store);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Gateway config whose default function table points at `base_url`.
pub fn gateway_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.functions.base_url = base_url.to_string();
    config.observability.metrics_enabled = false;
    config
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
