//! A TCP echo server
//!
//! Every accepted connection gets its own task that writes back each chunk
//! as soon as it is read. Used as the reference target for the tester and by
//! the test suites in place of hand-written echo loops.

use crate::{
    error::{AppError, Result},
    logging::EchoLogger,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinSet;

const READ_BUFFER_SIZE: usize = 16 * 1024;

/// Listening echo server
pub struct EchoServer {
    listener: TcpListener,
    logger: Option<Arc<EchoLogger>>,
}

impl EchoServer {
    /// Bind `host:port`; port 0 picks a free port, see [`local_addr`]
    ///
    /// [`local_addr`]: EchoServer::local_addr
    pub async fn bind(host: &str, port: u16) -> Result<Self> {
        let address = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|e| AppError::io(format!("Failed to bind {}: {}", address, e)))?;

        Ok(Self {
            listener,
            logger: None,
        })
    }

    pub fn with_logger(mut self, logger: Arc<EchoLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| AppError::io(format!("Failed to read listening address: {}", e)))
    }

    /// Serve until the process ends
    pub async fn serve(self) -> Result<()> {
        self.serve_until(std::future::pending()).await
    }

    /// Serve until `shutdown` resolves; open connections are dropped with the server
    pub async fn serve_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                _ = &mut shutdown => return Ok(()),
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
                accepted = self.listener.accept() => {
                    let (mut stream, peer) = accepted
                        .map_err(|e| AppError::io(format!("Failed to accept connection: {}", e)))?;
                    let logger = self.logger.clone();
                    let peer = peer.to_string();

                    connections.spawn(async move {
                        if let Some(logger) = &logger {
                            logger.log_peer_connected(&peer).await;
                        }

                        let mut echoed = 0;
                        let result = echo_stream(&mut stream, &mut echoed).await;

                        if let Some(logger) = &logger {
                            logger.log_peer_disconnected(&peer, echoed, result.err().as_ref()).await;
                        }
                    });
                }
            }
        }
    }
}

/// Write back every chunk read from `stream` until the peer closes it.
///
/// `echoed` tracks the bytes written so far, so it stays meaningful when an
/// error ends the connection.
pub async fn echo_stream<S>(stream: &mut S, echoed: &mut u64) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin + ?Sized,
{
    let mut buf = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let n = stream
            .read(&mut buf)
            .await
            .map_err(|e| AppError::read(format!("receive from client failed: {}", e)))?;
        if n == 0 {
            return Ok(());
        }

        stream
            .write_all(&buf[..n])
            .await
            .map_err(|e| AppError::write(format!("send to client failed: {}", e)))?;
        *echoed += n as u64;
    }
}
