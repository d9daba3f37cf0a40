//! Exact-length send and receive over a byte stream
//!
//! Echo servers are free to accept and return data in arbitrary chunks, so
//! both directions loop over partial transfers until the full length has
//! moved. Neither function ever touches bytes beyond the requested length.

use crate::error::{AppError, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Write all of `payload`, looping over partial writes, then flush.
///
/// Returns the number of bytes written, which is always `payload.len()`.
/// A write error, or a write that accepts zero bytes, is an
/// [`AppError::Write`].
pub async fn send_exact<S>(stream: &mut S, payload: &[u8]) -> Result<usize>
where
    S: AsyncWrite + Unpin + ?Sized,
{
    let total = payload.len();
    let mut written = 0;

    while written < total {
        let n = stream.write(&payload[written..]).await.map_err(|e| {
            AppError::write(format!("failed after {} of {} bytes: {}", written, total, e))
        })?;

        if n == 0 {
            return Err(AppError::write(format!(
                "peer stopped accepting data after {} of {} bytes",
                written, total
            )));
        }

        written += n;
    }

    stream
        .flush()
        .await
        .map_err(|e| AppError::write(format!("flush failed: {}", e)))?;

    Ok(written)
}

/// Read exactly `buf.len()` bytes into `buf`, looping over partial reads.
///
/// A read error, or end of stream before the buffer is full, is an
/// [`AppError::Read`].
pub async fn receive_exact_into<S>(stream: &mut S, buf: &mut [u8]) -> Result<()>
where
    S: AsyncRead + Unpin + ?Sized,
{
    let total = buf.len();
    let mut filled = 0;

    while filled < total {
        let n = stream.read(&mut buf[filled..]).await.map_err(|e| {
            AppError::read(format!("failed after {} of {} bytes: {}", filled, total, e))
        })?;

        if n == 0 {
            return Err(AppError::read(format!(
                "connection closed after {} of {} bytes",
                filled, total
            )));
        }

        filled += n;
    }

    Ok(())
}

/// Read exactly `length` bytes into a new buffer
pub async fn receive_exact<S>(stream: &mut S, length: usize) -> Result<Vec<u8>>
where
    S: AsyncRead + Unpin + ?Sized,
{
    let mut buf = vec![0u8; length];
    receive_exact_into(stream, &mut buf).await?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::echo::PayloadGenerator;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio_test::io::Builder;

    /// Sink that accepts at most `max_chunk` bytes per write call
    struct TrickleWriter {
        received: Vec<u8>,
        max_chunk: usize,
        writes: usize,
    }

    impl TrickleWriter {
        fn new(max_chunk: usize) -> Self {
            Self {
                received: Vec::new(),
                max_chunk,
                writes: 0,
            }
        }
    }

    impl AsyncWrite for TrickleWriter {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            let n = buf.len().min(self.max_chunk);
            self.received.extend_from_slice(&buf[..n]);
            self.writes += 1;
            Poll::Ready(Ok(n))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_send_exact_through_four_byte_writes() {
        let payload = PayloadGenerator::seeded(11).generate(1001);
        let mut writer = TrickleWriter::new(4);

        let written = send_exact(&mut writer, &payload).await.unwrap();

        assert_eq!(written, payload.len());
        assert_eq!(writer.received, payload);
        // 1001 bytes in chunks of at most 4
        assert_eq!(writer.writes, 251);
    }

    #[tokio::test]
    async fn test_send_exact_against_mock_stream() {
        let mut mock = Builder::new()
            .write(b"abcd")
            .write(b"efgh")
            .write(b"ij")
            .build();

        let written = send_exact(&mut mock, b"abcdefghij").await.unwrap();
        assert_eq!(written, 10);
    }

    #[tokio::test]
    async fn test_send_exact_zero_length_write_is_error() {
        let mut writer = TrickleWriter::new(0);

        let err = send_exact(&mut writer, b"payload").await.unwrap_err();
        assert_eq!(err.category(), "WRITE");
        assert!(err.to_string().contains("after 0 of 7 bytes"));
    }

    #[tokio::test]
    async fn test_send_exact_write_error() {
        let mut mock = Builder::new()
            .write(b"ab")
            .write_error(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"))
            .build();

        let err = send_exact(&mut mock, b"abcd").await.unwrap_err();
        assert_eq!(err.category(), "WRITE");
        assert!(err.to_string().contains("after 2 of 4 bytes"));
    }

    #[tokio::test]
    async fn test_receive_exact_reassembles_single_byte_reads() {
        let payload = PayloadGenerator::seeded(5).generate(64);

        let mut builder = Builder::new();
        for byte in payload.iter() {
            builder.read(std::slice::from_ref(byte));
        }
        let mut mock = builder.build();

        let received = receive_exact(&mut mock, payload.len()).await.unwrap();
        assert_eq!(received.len(), payload.len());
        assert_eq!(received, payload);
    }

    #[tokio::test]
    async fn test_receive_exact_does_not_over_read() {
        let mut data: &[u8] = b"abcdefgh";

        let first = receive_exact(&mut data, 4).await.unwrap();
        assert_eq!(first, b"abcd");
        assert_eq!(data, b"efgh");
    }

    #[tokio::test]
    async fn test_receive_exact_premature_eof() {
        let mut data: &[u8] = b"abc";

        let err = receive_exact(&mut data, 5).await.unwrap_err();
        assert_eq!(err.category(), "READ");
        assert!(err.to_string().contains("connection closed after 3 of 5 bytes"));
    }

    #[tokio::test]
    async fn test_receive_exact_read_error() {
        let mut mock = Builder::new()
            .read(b"ab")
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"))
            .build();

        let err = receive_exact(&mut mock, 4).await.unwrap_err();
        assert_eq!(err.category(), "READ");
        assert!(err.to_string().contains("reset by peer"));
    }

    #[tokio::test]
    async fn test_round_trip_over_duplex_with_tiny_buffer() {
        // A 3-byte pipe forces partial transfers on both ends
        let (mut client, mut server) = tokio::io::duplex(3);
        let payload = PayloadGenerator::seeded(9).generate(500);
        let expected = payload.clone();

        let echo = tokio::spawn(async move {
            let received = receive_exact(&mut server, 500).await.unwrap();
            send_exact(&mut server, &received).await.unwrap();
        });

        let sender = async {
            send_exact(&mut client, &payload).await.unwrap();
            receive_exact(&mut client, 500).await.unwrap()
        };

        let echoed = sender.await;
        echo.await.unwrap();
        assert_eq!(echoed, expected);
    }
}
