use crate::network::Network;
use std::sync::Arc;
use std::time::Duration;

/// Transport settings shared by every exchange a client performs.
///
/// Cheap to clone; the UDP truncation fallback works on a copy with
/// `network` forced to TCP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub network: Network,
    /// EDNS0 advertised buffer size. Zero disables EDNS0 on plain lookups.
    pub udp_size: u16,
    pub timeout: Duration,
    /// SNI for DNS-over-TLS and DNS-over-QUIC.
    pub server_name: Option<Arc<str>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: Network::Udp,
            udp_size: 0,
            timeout: Duration::from_secs(5),
            server_name: None,
        }
    }
}

impl ClientConfig {
    pub fn with_network(&self, network: Network) -> Self {
        Self {
            network,
            ..self.clone()
        }
    }

    /// Buffer size to advertise in EDNS0, only for UDP.
    pub fn edns_payload(&self) -> Option<u16> {
        (self.network == Network::Udp && self.udp_size > 0).then_some(self.udp_size)
    }
}
