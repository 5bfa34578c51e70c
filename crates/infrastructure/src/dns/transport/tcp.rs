use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_lookup_domain::{LookupError, QuicPhase};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// Largest message a 16-bit length prefix can describe.
pub const MAX_FRAMED_MESSAGE_SIZE: usize = 65535;

/// Failure while writing or reading a length-prefixed DNS message.
#[derive(Debug)]
pub enum FrameError {
    TooLarge(usize),
    Write(io::Error),
    ReadLength(io::Error),
    ReadBody(io::Error),
    /// The peer announced a zero-length message.
    EmptyBody,
}

impl FrameError {
    /// Error for a plain stream transport talking to `server`.
    pub fn into_transport(self, server: &str) -> LookupError {
        match self {
            FrameError::TooLarge(length) => LookupError::MessageTooLarge { length },
            FrameError::Write(e) => LookupError::transport(server, format!("write failed: {}", e)),
            FrameError::ReadLength(e) => {
                LookupError::transport(server, format!("failed to read response length: {}", e))
            }
            FrameError::ReadBody(e) => {
                LookupError::transport(server, format!("failed to read response body: {}", e))
            }
            FrameError::EmptyBody => LookupError::NilResponse,
        }
    }

    /// Error naming the DNS-over-QUIC phase that failed.
    pub fn into_quic(self) -> LookupError {
        match self {
            FrameError::TooLarge(length) => LookupError::MessageTooLarge { length },
            FrameError::Write(e) => LookupError::quic(QuicPhase::Write, e),
            FrameError::ReadLength(e) => LookupError::quic(QuicPhase::ReadLength, e),
            FrameError::ReadBody(e) => LookupError::quic(QuicPhase::ReadBody, e),
            FrameError::EmptyBody => LookupError::NilResponse,
        }
    }
}

/// DNS over TCP (RFC 1035 §4.2.2). One connection per exchange.
pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    async fn connect_new(&self, timeout: Duration) -> Result<TcpStream, LookupError> {
        let server = self.server_addr.to_string();

        let stream = tokio::time::timeout(timeout, TcpStream::connect(self.server_addr))
            .await
            .map_err(|_| LookupError::TransportTimeout {
                server: server.clone(),
            })?
            .map_err(|e| LookupError::transport(&server, format!("connection refused: {}", e)))?;

        stream
            .set_nodelay(true)
            .map_err(|e| LookupError::transport(&server, format!("TCP_NODELAY: {}", e)))?;

        Ok(stream)
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, LookupError> {
        let server = self.server_addr.to_string();

        if message_bytes.len() > MAX_FRAMED_MESSAGE_SIZE {
            return Err(LookupError::MessageTooLarge {
                length: message_bytes.len(),
            });
        }

        let mut stream = self.connect_new(timeout).await?;
        let local_addr = stream.local_addr().ok();

        tokio::time::timeout(timeout, send_with_length_prefix(&mut stream, message_bytes))
            .await
            .map_err(|_| LookupError::TransportTimeout {
                server: server.clone(),
            })?
            .map_err(|e| e.into_transport(&server))?;

        debug!(
            server = %self.server_addr,
            message_len = message_bytes.len(),
            "TCP query sent"
        );

        let response_bytes = tokio::time::timeout(timeout, read_with_length_prefix(&mut stream))
            .await
            .map_err(|_| LookupError::TransportTimeout {
                server: server.clone(),
            })?
            .map_err(|e| e.into_transport(&server))?;

        debug!(
            server = %self.server_addr,
            response_len = response_bytes.len(),
            "TCP response received"
        );

        Ok(TransportResponse::plain(
            response_bytes,
            local_addr,
            self.server_addr,
        ))
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}

/// Writes a 2-byte big-endian length followed by the message.
pub async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> Result<(), FrameError>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len())
        .map_err(|_| FrameError::TooLarge(message_bytes.len()))?;

    stream
        .write_all(&length.to_be_bytes())
        .await
        .map_err(FrameError::Write)?;
    stream
        .write_all(message_bytes)
        .await
        .map_err(FrameError::Write)?;
    stream.flush().await.map_err(FrameError::Write)?;

    Ok(())
}

/// Reads a 2-byte big-endian length, then exactly that many bytes. A zero
/// length is `FrameError::EmptyBody`.
pub async fn read_with_length_prefix<S>(stream: &mut S) -> Result<Vec<u8>, FrameError>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream
        .read_exact(&mut len_buf)
        .await
        .map_err(FrameError::ReadLength)?;

    let response_len = u16::from_be_bytes(len_buf) as usize;
    if response_len == 0 {
        return Err(FrameError::EmptyBody);
    }

    let mut response = vec![0u8; response_len];
    stream
        .read_exact(&mut response)
        .await
        .map_err(FrameError::ReadBody)?;

    Ok(response)
}
