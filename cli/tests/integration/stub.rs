//! Minimal HTTP/1.1 stub server for readiness tests.
//!
//! Answers each connection with the next scripted status (repeating the last
//! one), records the request line, and closes the connection.

#![allow(dead_code, clippy::expect_used)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub struct StubServer {
    pub addr: SocketAddr,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Serve `statuses` in order; the last one repeats forever.
    pub async fn start(statuses: &[u16]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let script: VecDeque<u16> = statuses.iter().copied().collect();

        let log = Arc::clone(&requests);
        tokio::spawn(async move {
            let mut script = script;
            let mut last = 200;
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                if let Some(next) = script.pop_front() {
                    last = next;
                }
                respond(stream, last, &log).await;
            }
        });

        Self { addr, requests }
    }

    /// Accept connections but never answer them.
    pub async fn silent() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });
        Self {
            addr,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn request_lines(&self) -> Vec<String> {
        self.requests.lock().expect("lock").clone()
    }
}

async fn respond(mut stream: TcpStream, status: u16, log: &Mutex<Vec<String>>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let request = String::from_utf8_lossy(&buf);
    if let Some(line) = request.lines().next() {
        log.lock().expect("lock").push(line.to_string());
    }

    let mut response = format!(
        "HTTP/1.1 {status} Stub\r\ncontent-length: 0\r\nconnection: close\r\n"
    );
    if (300..400).contains(&status) {
        response.push_str("location: /elsewhere\r\n");
    }
    response.push_str("\r\n");
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// A local port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    port
}
