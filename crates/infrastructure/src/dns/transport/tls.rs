//! TLS Transport for DNS queries, DNS-over-TLS (RFC 7858)
//!
//! The rustls `ClientConfig` is built once and shared, so session tickets
//! are resumed across exchanges. Each exchange opens its own connection and
//! reports the negotiated session parameters alongside the response.

use super::tcp::{read_with_length_prefix, send_with_length_prefix, MAX_FRAMED_MESSAGE_SIZE};
use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_lookup_application::ports::TlsSummary;
use ferrous_lookup_domain::LookupError;
use rustls::pki_types::ServerName;
use rustls::{ClientConnection, ProtocolVersion};
use std::net::SocketAddr;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

/// Shared TLS config, built once and reused for all DoT queries.
static SHARED_TLS_CONFIG: LazyLock<Arc<rustls::ClientConfig>> = LazyLock::new(|| {
    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Arc::new(config)
});

/// DNS-over-TLS transport (RFC 7858)
pub struct TlsTransport {
    server_addr: SocketAddr,
    hostname: String,
    tls_config: Arc<rustls::ClientConfig>,
}

impl TlsTransport {
    pub fn new(server_addr: SocketAddr, hostname: String) -> Self {
        Self::with_config(server_addr, hostname, Arc::clone(&SHARED_TLS_CONFIG))
    }

    pub fn with_config(
        server_addr: SocketAddr,
        hostname: String,
        tls_config: Arc<rustls::ClientConfig>,
    ) -> Self {
        Self {
            server_addr,
            hostname,
            tls_config,
        }
    }
}

#[async_trait]
impl DnsTransport for TlsTransport {
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

        let connector = tokio_rustls::TlsConnector::from(Arc::clone(&self.tls_config));
        let server_name = ServerName::try_from(self.hostname.clone()).map_err(|e| {
            LookupError::configuration(format!("Invalid TLS hostname '{}': {}", self.hostname, e))
        })?;

        let tcp_stream = tokio::time::timeout(timeout, TcpStream::connect(self.server_addr))
            .await
            .map_err(|_| LookupError::TransportTimeout {
                server: server.clone(),
            })?
            .map_err(|e| LookupError::transport(&server, format!("connection refused: {}", e)))?;
        let local_addr = tcp_stream.local_addr().ok();

        let mut stream = tokio::time::timeout(timeout, connector.connect(server_name, tcp_stream))
            .await
            .map_err(|_| LookupError::TransportTimeout {
                server: server.clone(),
            })?
            .map_err(|e| LookupError::transport(&server, format!("TLS handshake failed: {}", e)))?;

        debug!(server = %self.server_addr, hostname = %self.hostname, "TLS connection established");

        tokio::time::timeout(timeout, send_with_length_prefix(&mut stream, message_bytes))
            .await
            .map_err(|_| LookupError::TransportTimeout {
                server: server.clone(),
            })?
            .map_err(|e| e.into_transport(&server))?;

        let response_bytes = tokio::time::timeout(timeout, read_with_length_prefix(&mut stream))
            .await
            .map_err(|_| LookupError::TransportTimeout {
                server: server.clone(),
            })?
            .map_err(|e| e.into_transport(&server))?;

        debug!(
            server = %self.server_addr,
            response_len = response_bytes.len(),
            "TLS response received"
        );

        let (_, connection) = stream.get_ref();
        let tls = tls_summary(connection, &self.hostname);

        Ok(TransportResponse {
            bytes: bytes::Bytes::from(response_bytes),
            local_addr,
            remote_addr: Some(self.server_addr),
            tls: Some(tls),
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TLS"
    }
}

fn tls_summary(connection: &ClientConnection, hostname: &str) -> TlsSummary {
    TlsSummary {
        version: connection.protocol_version().map(version_label),
        cipher: connection
            .negotiated_cipher_suite()
            .map(|suite| format!("{:?}", suite.suite())),
        next_protocol: connection
            .alpn_protocol()
            .map(|p| String::from_utf8_lossy(p).into_owned()),
        server_name: Some(hostname.to_string()),
        peer_certificates: connection.peer_certificates().map_or(0, |certs| certs.len()),
        established: !connection.is_handshaking(),
        client_initiated: true,
    }
}

fn version_label(version: ProtocolVersion) -> String {
    match version {
        ProtocolVersion::TLSv1_3 => "1.3".to_string(),
        ProtocolVersion::TLSv1_2 => "1.2".to_string(),
        other => format!("{:?}", other),
    }
}
