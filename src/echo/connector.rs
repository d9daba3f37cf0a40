//! Opening the byte stream a worker talks to the echo server over

use crate::error::{AppError, Result};
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// Source of bidirectional byte streams to an echo endpoint
#[async_trait]
pub trait EchoConnector: Send + Sync {
    /// Stream type owned by one worker for its whole lifetime
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    /// Open a new stream, failing with [`AppError::Connection`]
    async fn connect(&self, host: &str, port: u16) -> Result<Self::Stream>;
}

/// Plain TCP connector, one connection per call
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

#[async_trait]
impl EchoConnector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, host: &str, port: u16) -> Result<TcpStream> {
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|e| AppError::connection(format!("{}:{}: {}", host, port, e)))?;

        // Payloads are written in one go and waited on; don't let Nagle hold them back
        stream
            .set_nodelay(true)
            .map_err(|e| AppError::connection(format!("{}:{}: set_nodelay failed: {}", host, port, e)))?;

        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_tcp_connect_success() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let accept = tokio::spawn(async move { listener.accept().await.map(|_| ()) });

        let stream = TcpConnector.connect("127.0.0.1", port).await.unwrap();
        assert_eq!(stream.peer_addr().unwrap().port(), port);
        assert!(stream.nodelay().unwrap());
        accept.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_tcp_connect_refused() {
        // Bind then drop to get a port nothing listens on
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let err = TcpConnector.connect("127.0.0.1", port).await.unwrap_err();
        assert_eq!(err.category(), "CONNECT");
        assert!(err.to_string().contains(&format!("127.0.0.1:{}", port)));
    }
}
