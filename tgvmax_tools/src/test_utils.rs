//! A throwaway HTTP server that stands in for the records endpoint in tests.
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

use crate::TgvMaxConfig;

/// Answers each connection with the next canned `(status, body)` pair. The last pair is repeated once the list runs
/// out. Every response closes its connection, so one connection is one request.
pub struct StubServer {
    url: String,
    hits: Arc<AtomicUsize>,
}

impl StubServer {
    pub async fn start(responses: Vec<(u16, String)>) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}/records", listener.local_addr()?);
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let Some((status, body)) = responses.get(n).or(responses.last()) else {
                    break;
                };
                let mut request = vec![0u8; 8192];
                let _ = socket.read(&mut request).await;
                let reason = if *status == 200 { "OK" } else { "Error" };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: \
                     close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        Ok(Self { url, hits })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Number of requests received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// A client configuration pointing at this server.
    pub fn config(&self) -> TgvMaxConfig {
        TgvMaxConfig { base_url: self.url.clone(), ..TgvMaxConfig::default() }
    }
}
