//! Shared utilities for integration testing: minimal mock cluster members.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Build a member status document.
#[allow(dead_code)]
pub fn status_doc(member_id: u64, leader_id: u64, committed: u64) -> String {
    serde_json::json!({
        "member_id": member_id,
        "leader_id": leader_id,
        "raft_term": 7,
        "raft_index": committed,
        "db_size": 4_194_304u64,
        "db_size_in_use": 2_097_152u64,
        "proposals_committed": committed,
        "proposals_applied": committed,
        "proposals_pending": 0,
        "proposals_failed": 0,
    })
    .to_string()
}

/// Start a mock member that answers every request with the given JSON body.
#[allow(dead_code)]
pub async fn start_member_backend(addr: SocketAddr, body: String) {
    serve(addr, body, Duration::ZERO).await;
}

/// Start a mock member that delays its response, for timeout tests.
#[allow(dead_code)]
pub async fn start_slow_member_backend(addr: SocketAddr, body: String, delay: Duration) {
    serve(addr, body, delay).await;
}

async fn serve(addr: SocketAddr, body: String, delay: Duration) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let body = body.clone();
                    tokio::spawn(async move {
                        // Drain the request head before responding.
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;

                        if delay > Duration::ZERO {
                            tokio::time::sleep(delay).await;
                        }

                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}
