//! DNS-over-QUIC transport (RFC 9250).
//!
//! One bidirectional stream per query. The request is a 2-byte big-endian
//! length followed by the message, after which the write side is finished;
//! the response is framed the same way. Connections built from the default
//! configuration are pooled per (address, server name) and reused.

use super::tcp::{read_with_length_prefix, send_with_length_prefix, MAX_FRAMED_MESSAGE_SIZE};
use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use dashmap::DashMap;
use ferrous_lookup_domain::{LookupError, QuicPhase};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};
use tracing::debug;

/// ALPN token negotiated when no TLS configuration is supplied.
pub const DOQ_ALPN: &[u8] = b"doq";

type PoolKey = (SocketAddr, Arc<str>);

static SHARED_QUIC_CLIENT_CONFIG: LazyLock<Result<quinn::ClientConfig, String>> =
    LazyLock::new(|| {
        let mut root_store = rustls::RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let mut tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();
        tls_config.alpn_protocols = vec![DOQ_ALPN.to_vec()];
        tls_config.resumption = rustls::client::Resumption::in_memory_sessions(64);
        client_config_from_tls(Arc::new(tls_config))
    });

static QUIC_ENDPOINT_V4: LazyLock<io::Result<quinn::Endpoint>> =
    LazyLock::new(|| quinn::Endpoint::client(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))));

static QUIC_ENDPOINT_V6: LazyLock<io::Result<quinn::Endpoint>> =
    LazyLock::new(|| quinn::Endpoint::client(SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))));

static QUIC_POOL: LazyLock<DashMap<PoolKey, quinn::Connection>> = LazyLock::new(DashMap::new);

fn quic_endpoint_for(addr: &SocketAddr) -> Result<&'static quinn::Endpoint, LookupError> {
    let endpoint = if addr.is_ipv4() {
        &*QUIC_ENDPOINT_V4
    } else {
        &*QUIC_ENDPOINT_V6
    };
    endpoint
        .as_ref()
        .map_err(|e| LookupError::quic(QuicPhase::Dial, format!("client endpoint: {}", e)))
}

fn client_config_from_tls(tls: Arc<rustls::ClientConfig>) -> Result<quinn::ClientConfig, String> {
    let quic_config = quinn::crypto::rustls::QuicClientConfig::try_from(tls)
        .map_err(|e| format!("TLS configuration unusable for QUIC: {}", e))?;
    Ok(quinn::ClientConfig::new(Arc::new(quic_config)))
}

/// Caller-supplied TLS and QUIC settings. Either may be left unset.
#[derive(Clone, Default)]
pub struct QuicOptions {
    pub tls_config: Option<Arc<rustls::ClientConfig>>,
    pub transport_config: Option<Arc<quinn::TransportConfig>>,
}

impl QuicOptions {
    fn is_default(&self) -> bool {
        self.tls_config.is_none() && self.transport_config.is_none()
    }
}

pub struct QuicTransport {
    server_addr: SocketAddr,
    hostname: Arc<str>,
    options: QuicOptions,
}

impl QuicTransport {
    pub fn new(server_addr: SocketAddr, hostname: Arc<str>) -> Self {
        Self::with_options(server_addr, hostname, QuicOptions::default())
    }

    pub fn with_options(server_addr: SocketAddr, hostname: Arc<str>, options: QuicOptions) -> Self {
        Self {
            server_addr,
            hostname,
            options,
        }
    }

    fn pool_key(&self) -> PoolKey {
        (self.server_addr, Arc::clone(&self.hostname))
    }

    fn client_config(&self) -> Result<quinn::ClientConfig, LookupError> {
        let mut config = match &self.options.tls_config {
            Some(tls) => client_config_from_tls(Arc::clone(tls)).map_err(LookupError::configuration)?,
            None => SHARED_QUIC_CLIENT_CONFIG
                .as_ref()
                .map_err(|e| LookupError::configuration(e.clone()))?
                .clone(),
        };
        if let Some(transport) = &self.options.transport_config {
            config.transport_config(Arc::clone(transport));
        }
        Ok(config)
    }

    /// Returns a live connection and whether it came from the pool.
    async fn get_or_connect(
        &self,
        timeout: Duration,
    ) -> Result<(quinn::Connection, bool), LookupError> {
        if !self.options.is_default() {
            return Ok((self.connect_new(timeout).await?, false));
        }

        let key = self.pool_key();
        if let Some(conn) = QUIC_POOL.get(&key) {
            if conn.close_reason().is_none() {
                return Ok((conn.clone(), true));
            }
            drop(conn);
            QUIC_POOL.remove(&key);
        }
        let conn = self.connect_new(timeout).await?;
        QUIC_POOL.insert(key, conn.clone());
        Ok((conn, false))
    }

    async fn connect_new(&self, timeout: Duration) -> Result<quinn::Connection, LookupError> {
        let endpoint = quic_endpoint_for(&self.server_addr)?;

        let connecting = endpoint
            .connect_with(self.client_config()?, self.server_addr, &self.hostname)
            .map_err(|e| LookupError::quic(QuicPhase::Dial, e))?;

        tokio::time::timeout(timeout, connecting)
            .await
            .map_err(|_| LookupError::TransportTimeout {
                server: self.server_addr.to_string(),
            })?
            .map_err(|e| {
                LookupError::quic(
                    QuicPhase::Dial,
                    format!("{}({}): {}", self.hostname, self.server_addr, e),
                )
            })
    }

    async fn open_stream(
        &self,
        conn: &quinn::Connection,
        timeout: Duration,
    ) -> Result<(quinn::SendStream, quinn::RecvStream), LookupError> {
        tokio::time::timeout(timeout, conn.open_bi())
            .await
            .map_err(|_| LookupError::TransportTimeout {
                server: self.server_addr.to_string(),
            })?
            .map_err(|e| LookupError::quic(QuicPhase::StreamOpen, e))
    }

    async fn exchange_on_stream(
        &self,
        mut send_stream: quinn::SendStream,
        mut recv_stream: quinn::RecvStream,
        message_bytes: &[u8],
        deadline: Instant,
    ) -> Result<Vec<u8>, LookupError> {
        let timed_out = || LookupError::TransportTimeout {
            server: self.server_addr.to_string(),
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        tokio::time::timeout(
            remaining,
            send_with_length_prefix(&mut send_stream, message_bytes),
        )
        .await
        .map_err(|_| timed_out())?
        .map_err(|e| e.into_quic())?;

        send_stream
            .finish()
            .map_err(|e| LookupError::quic(QuicPhase::Write, e))?;

        let remaining = deadline.saturating_duration_since(Instant::now());
        tokio::time::timeout(remaining, read_with_length_prefix(&mut recv_stream))
            .await
            .map_err(|_| timed_out())?
            .map_err(|e| e.into_quic())
    }

    fn local_addr(&self, conn: &quinn::Connection) -> Option<SocketAddr> {
        let bound = quic_endpoint_for(&self.server_addr).ok()?.local_addr().ok()?;
        Some(match conn.local_ip() {
            Some(ip) => SocketAddr::new(ip, bound.port()),
            None => bound,
        })
    }
}

#[async_trait]
impl DnsTransport for QuicTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, LookupError> {
        if message_bytes.len() > MAX_FRAMED_MESSAGE_SIZE {
            return Err(LookupError::MessageTooLarge {
                length: message_bytes.len(),
            });
        }

        let deadline = Instant::now() + timeout;
        let (mut conn, pooled) = self.get_or_connect(timeout).await?;

        let (send_stream, recv_stream) = match self.open_stream(&conn, timeout).await {
            Ok(streams) => streams,
            Err(_) if pooled => {
                debug!(server = %self.server_addr, "QUIC connection stale, reconnecting");
                QUIC_POOL.remove(&self.pool_key());
                conn = self.connect_new(timeout).await?;
                QUIC_POOL.insert(self.pool_key(), conn.clone());
                self.open_stream(&conn, timeout).await?
            }
            Err(e) => return Err(e),
        };

        let response_bytes = self
            .exchange_on_stream(send_stream, recv_stream, message_bytes, deadline)
            .await?;

        debug!(
            server = %self.server_addr,
            response_len = response_bytes.len(),
            pooled = pooled,
            "QUIC response received"
        );

        Ok(TransportResponse {
            bytes: bytes::Bytes::from(response_bytes),
            local_addr: self.local_addr(&conn),
            remote_addr: Some(conn.remote_address()),
            tls: None,
        })
    }

    fn protocol_name(&self) -> &'static str {
        "QUIC"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quic_transport_creation() {
        let addr: SocketAddr = "94.140.14.14:853".parse().unwrap();
        let transport = QuicTransport::new(addr, Arc::from("dns.adguard-dns.com"));
        assert_eq!(transport.protocol_name(), "QUIC");
        assert!(transport.options.is_default());
    }

    #[test]
    fn test_shared_config_negotiates_doq() {
        assert!(SHARED_QUIC_CLIENT_CONFIG.is_ok());
    }

    #[tokio::test]
    async fn test_oversized_message_fails_before_dial() {
        // Nothing listens here; reaching the dial would time out instead.
        let addr: SocketAddr = "127.0.0.1:9".parse().unwrap();
        let transport = QuicTransport::new(addr, Arc::from("localhost"));
        let message = vec![0u8; MAX_FRAMED_MESSAGE_SIZE + 1];

        let err = transport
            .send(&message, Duration::from_millis(100))
            .await
            .unwrap_err();
        assert_eq!(err, LookupError::MessageTooLarge { length: 65536 });
    }
}
