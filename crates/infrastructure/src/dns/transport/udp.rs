//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing). The receive buffer is sized for
//! the advertised EDNS(0) payload; a response with the TC bit set is handed
//! back unchanged and the client retries it over TCP.

use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_lookup_domain::LookupError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::debug;

/// Smallest receive buffer, large enough for any EDNS(0) response we ask for.
const MIN_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP transport
pub struct UdpTransport {
    server_addr: SocketAddr,
    recv_size: usize,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr, udp_size: u16) -> Self {
        Self {
            server_addr,
            recv_size: MIN_UDP_RESPONSE_SIZE.max(udp_size as usize),
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, LookupError> {
        let server = self.server_addr.to_string();
        let bind_addr = if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| LookupError::transport(&server, format!("bind failed: {}", e)))?;

        // Connected sockets drop datagrams from any other peer.
        socket
            .connect(self.server_addr)
            .await
            .map_err(|e| LookupError::transport(&server, format!("connect failed: {}", e)))?;

        let bytes_sent = tokio::time::timeout(timeout, socket.send(message_bytes))
            .await
            .map_err(|_| LookupError::TransportTimeout {
                server: server.clone(),
            })?
            .map_err(|e| LookupError::transport(&server, format!("send failed: {}", e)))?;

        debug!(server = %self.server_addr, bytes_sent = bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; self.recv_size];
        let bytes_received = tokio::time::timeout(timeout, socket.recv(&mut recv_buf))
            .await
            .map_err(|_| LookupError::TransportTimeout {
                server: server.clone(),
            })?
            .map_err(|e| LookupError::transport(&server, format!("receive failed: {}", e)))?;

        recv_buf.truncate(bytes_received);
        validate_response_id(message_bytes, &recv_buf, self.server_addr)?;

        debug!(
            server = %self.server_addr,
            bytes_received = bytes_received,
            "UDP response received"
        );

        Ok(TransportResponse::plain(
            recv_buf,
            socket.local_addr().ok(),
            self.server_addr,
        ))
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}

/// Rejects an empty datagram, and a response whose transaction ID differs
/// from the query's.
pub(crate) fn validate_response_id(
    query: &[u8],
    response: &[u8],
    server_addr: SocketAddr,
) -> Result<(), LookupError> {
    if query.len() < 2 {
        return Err(LookupError::Encode(format!(
            "query too short to carry an ID: {} bytes",
            query.len()
        )));
    }
    if response.is_empty() {
        return Err(LookupError::NilResponse);
    }
    if response.len() < 2 {
        return Err(LookupError::Decode(format!(
            "response from {} too short: {} bytes",
            server_addr,
            response.len()
        )));
    }

    let expected = u16::from_be_bytes([query[0], query[1]]);
    let received = u16::from_be_bytes([response[0], response[1]]);
    if expected != received {
        return Err(LookupError::ResponseIdMismatch {
            server: server_addr.to_string(),
            expected,
            received,
        });
    }

    Ok(())
}

#[cfg(test)]
#[path = "udp_test.rs"]
mod udp_test;
