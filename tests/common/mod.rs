//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use linkpage_edge::config::EdgeConfig;
use linkpage_edge::lifecycle::{build_server, Shutdown};

pub const SHELL_HTML: &str = concat!(
    "<!DOCTYPE html><html><head><title>Static Links Page</title></head>",
    "<body class=\"bg-gray-900\">",
    "<div id=\"profile\" style=\"display: none\"><img id=\"avatar\" src=\"#\">",
    "<h1 id=\"name\"></h1></div>",
    "<div id=\"links\"></div>",
    "<div id=\"social\" style=\"display: none\"></div>",
    "</body></html>"
);

pub const LINKS_JSON: &str = r#"{"links":[{"name":"Blog","url":"https://blog.test"},{"name":"Talks","url":"https://talks.test"}]}"#;

/// A canned upstream answer.
#[derive(Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: &'static str,
    /// Written one at a time with `chunk_delay` in between.
    pub chunks: Vec<&'static str>,
    pub chunk_delay: Duration,
    /// Delay before anything is written.
    pub delay: Duration,
    /// Announce this many extra body bytes that never arrive.
    pub truncate_by: usize,
}

impl MockResponse {
    pub fn ok(content_type: &'static str, body: &'static str) -> Self {
        Self {
            status: 200,
            content_type,
            chunks: vec![body],
            chunk_delay: Duration::ZERO,
            delay: Duration::ZERO,
            truncate_by: 0,
        }
    }

    pub fn html(body: &'static str) -> Self {
        Self::ok("text/html; charset=utf-8", body)
    }

    pub fn json(body: &'static str) -> Self {
        Self::ok("application/json", body)
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::ok("text/plain", "upstream error")
        }
    }

    pub fn chunked(mut self, chunks: Vec<&'static str>, delay: Duration) -> Self {
        self.chunks = chunks;
        self.chunk_delay = delay;
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn truncated(mut self, missing: usize) -> Self {
        self.truncate_by = missing;
        self
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Start a mock upstream serving `routes` by request path; unknown paths get 404.
pub async fn start_mock_upstream(routes: Vec<(&'static str, MockResponse)>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes: Arc<HashMap<&'static str, MockResponse>> = Arc::new(routes.into_iter().collect());

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let routes = routes.clone();
                    tokio::spawn(async move {
                        let Some(path) = read_request_path(&mut socket).await else {
                            return;
                        };
                        let response = routes
                            .get(path.as_str())
                            .cloned()
                            .unwrap_or_else(|| MockResponse::status(404));

                        tokio::time::sleep(response.delay).await;

                        let length: usize = response.chunks.iter().map(|c| c.len()).sum();
                        let head = format!(
                            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                            status_text(response.status),
                            response.content_type,
                            length + response.truncate_by,
                        );
                        if socket.write_all(head.as_bytes()).await.is_err() {
                            return;
                        }
                        for chunk in &response.chunks {
                            if socket.write_all(chunk.as_bytes()).await.is_err() {
                                return;
                            }
                            let _ = socket.flush().await;
                            tokio::time::sleep(response.chunk_delay).await;
                        }
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_request_path(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let head = String::from_utf8_lossy(&buf);
    head.lines()
        .next()?
        .split_whitespace()
        .nth(1)
        .map(str::to_string)
}

/// Config pointing at a mock upstream's `/shell` and `/links.json`.
pub fn config_for(upstream: SocketAddr) -> EdgeConfig {
    let mut config = EdgeConfig::default();
    config.upstream.shell_url = format!("http://{}/shell", upstream);
    config.upstream.links_url = format!("http://{}/links.json", upstream);
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config
}

/// Start the edge server on an ephemeral port.
pub async fn start_edge(config: EdgeConfig) -> (SocketAddr, Shutdown) {
    let server = build_server(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}
