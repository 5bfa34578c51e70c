use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::client_config::ClientConfig;
use crate::network::{with_default_port, Network};

/// Which resolver to query and how to reach it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// `host` or `host:port`. When unset the first `nameserver` entry of
    /// `resolv_conf` is used.
    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub network: Network,

    /// EDNS0 buffer size advertised on UDP lookups, 0 to send no OPT record.
    #[serde(default)]
    pub udp_size: u16,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// TLS server name for `tcp-tls` and `quic`.
    #[serde(default)]
    pub server_name: Option<String>,

    #[serde(default = "default_port")]
    pub default_port: u16,

    #[serde(default = "default_resolv_conf")]
    pub resolv_conf: String,

    #[serde(default = "default_max_cname_depth")]
    pub max_cname_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            address: None,
            network: Network::default(),
            udp_size: 0,
            timeout_ms: default_timeout_ms(),
            server_name: None,
            default_port: default_port(),
            resolv_conf: default_resolv_conf(),
            max_cname_depth: default_max_cname_depth(),
        }
    }
}

impl ResolverConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            network: self.network,
            udp_size: self.udp_size,
            timeout: Duration::from_millis(self.timeout_ms),
            server_name: self.server_name.as_deref().map(Into::into),
        }
    }

    /// The configured address with `default_port` applied, if any.
    pub fn resolver_address(&self) -> Option<String> {
        self.address
            .as_deref()
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .map(|address| with_default_port(address, self.default_port))
    }
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_port() -> u16 {
    53
}

fn default_resolv_conf() -> String {
    "/etc/resolv.conf".to_string()
}

fn default_max_cname_depth() -> usize {
    16
}
