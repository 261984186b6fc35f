//! Shared test utilities for the HTTP clients.
//!
//! `serve_once` binds a loopback listener that answers exactly one request
//! with a canned response, so client code can be exercised against real
//! status lines and headers without leaving the machine.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Answer the next request with `status` (e.g. `"404 Not Found"`), the given
/// `Content-Type` and `body`. Returns the base URL of the listener.
pub async fn serve_once(status: &str, content_type: &str, body: &[u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // requests under test carry no body that matters, headers are enough
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        socket.write_all(&response).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{addr}")
}
