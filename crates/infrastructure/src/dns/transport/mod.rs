#[cfg(feature = "dns-over-quic")]
pub mod quic;
pub mod resolver;
pub mod tcp;
#[cfg(feature = "dns-over-rustls")]
pub mod tls;
pub mod udp;

use async_trait::async_trait;
use bytes::Bytes;
use ferrous_lookup_application::ports::TlsSummary;
use ferrous_lookup_domain::{split_host_port, ClientConfig, LookupError, Network};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Bytes,

    pub local_addr: Option<SocketAddr>,

    pub remote_addr: Option<SocketAddr>,

    pub tls: Option<TlsSummary>,
}

impl TransportResponse {
    pub(crate) fn plain(
        bytes: Vec<u8>,
        local_addr: Option<SocketAddr>,
        remote_addr: SocketAddr,
    ) -> Self {
        Self {
            bytes: Bytes::from(bytes),
            local_addr,
            remote_addr: Some(remote_addr),
            tls: None,
        }
    }
}

#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, LookupError>;

    fn protocol_name(&self) -> &'static str;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
    #[cfg(feature = "dns-over-rustls")]
    Tls(tls::TlsTransport),
    #[cfg(feature = "dns-over-quic")]
    Quic(quic::QuicTransport),
}

impl Transport {
    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, LookupError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            #[cfg(feature = "dns-over-rustls")]
            Self::Tls(t) => DnsTransport::send(t, message_bytes, timeout).await,
            #[cfg(feature = "dns-over-quic")]
            Self::Quic(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(_) => "UDP",
            Self::Tcp(_) => "TCP",
            #[cfg(feature = "dns-over-rustls")]
            Self::Tls(_) => "TLS",
            #[cfg(feature = "dns-over-quic")]
            Self::Quic(_) => "QUIC",
        }
    }
}

/// Resolves `server` ("host:port") to a socket address. IP literals are
/// used as-is; hostnames go through the system resolver and the first
/// address wins.
pub async fn resolve_server(server: &str, timeout: Duration) -> Result<SocketAddr, LookupError> {
    let (host, port) = split_host_port(server).ok_or_else(|| {
        LookupError::configuration(format!("Resolver address '{}' has no port", server))
    })?;

    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }

    let addrs = resolver::resolve_all(host, port, timeout).await?;
    addrs
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::transport(server, "no addresses"))
}

/// Host part of `server`, used as SNI when none is configured.
fn host_of(server: &str) -> &str {
    split_host_port(server)
        .map(|(host, _)| host)
        .unwrap_or(server)
}

/// SNI for encrypted transports: the configured name, else the host part of
/// `server`.
pub(crate) fn server_name_for(server: &str, config: &ClientConfig) -> String {
    config
        .server_name
        .as_deref()
        .unwrap_or_else(|| host_of(server))
        .to_string()
}

pub async fn create_transport(
    server: &str,
    config: &ClientConfig,
) -> Result<Transport, LookupError> {
    let addr = resolve_server(server, config.timeout).await?;
    let server_name = server_name_for(server, config);

    match config.network {
        Network::Udp => Ok(Transport::Udp(udp::UdpTransport::new(
            addr,
            config.udp_size,
        ))),
        Network::Tcp => Ok(Transport::Tcp(tcp::TcpTransport::new(addr))),

        #[cfg(feature = "dns-over-rustls")]
        Network::TcpTls => Ok(Transport::Tls(tls::TlsTransport::new(addr, server_name))),

        #[cfg(not(feature = "dns-over-rustls"))]
        Network::TcpTls => Err(LookupError::configuration(format!(
            "TLS feature not enabled. Enable 'dns-over-rustls' feature to use: {} ({})",
            server, server_name
        ))),

        #[cfg(feature = "dns-over-quic")]
        Network::Quic => Ok(Transport::Quic(quic::QuicTransport::new(
            addr,
            server_name.into(),
        ))),

        #[cfg(not(feature = "dns-over-quic"))]
        Network::Quic => Err(LookupError::configuration(format!(
            "QUIC feature not enabled. Enable 'dns-over-quic' feature to use: {} ({})",
            server, server_name
        ))),
    }
}
