use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Transport a `ClientConfig` exchanges over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    #[default]
    Udp,
    Tcp,
    TcpTls,
    Quic,
}

impl Network {
    pub fn name(&self) -> &'static str {
        match self {
            Network::Udp => "udp",
            Network::Tcp => "tcp",
            Network::TcpTls => "tcp-tls",
            Network::Quic => "quic",
        }
    }

    /// Transport label recorded for a completed round trip: lower-case, with
    /// the `-tls` suffix stripped. QUIC rides on UDP datagrams.
    pub fn context_transport(&self) -> &'static str {
        match self {
            Network::Udp | Network::Quic => "udp",
            Network::Tcp | Network::TcpTls => "tcp",
        }
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self, Network::TcpTls | Network::Quic)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "udp" => Ok(Network::Udp),
            "tcp" => Ok(Network::Tcp),
            "tcp-tls" | "tls" | "dot" => Ok(Network::TcpTls),
            "quic" | "doq" => Ok(Network::Quic),
            _ => Err(format!(
                "Invalid network '{}'. Expected: udp, tcp, tcp-tls or quic",
                s
            )),
        }
    }
}

/// Splits `host:port` or `[v6]:port`. Returns `None` when no port is present.
pub fn split_host_port(s: &str) -> Option<(&str, u16)> {
    if s.starts_with('[') {
        let end = s.find(']')?;
        let host = &s[1..end];
        let rest = &s[end + 1..];
        let port_str = rest.strip_prefix(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    } else {
        let (host, port_str) = s.rsplit_once(':')?;
        if host.contains(':') {
            return None;
        }
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    }
}

/// Appends `port` to `host` unless it already carries one. Bare IPv6
/// literals are bracketed.
pub fn with_default_port(host: &str, port: u16) -> String {
    if split_host_port(host).is_some() {
        return host.to_string();
    }
    match host.parse::<IpAddr>() {
        Ok(IpAddr::V6(v6)) => format!("[{}]:{}", v6, port),
        _ => format!("{}:{}", host, port),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_transport_strips_tls() {
        assert_eq!(Network::TcpTls.context_transport(), "tcp");
        assert_eq!(Network::Quic.context_transport(), "udp");
        assert_eq!(Network::Udp.context_transport(), "udp");
    }

    #[test]
    fn test_split_host_port() {
        assert_eq!(split_host_port("8.8.8.8:53"), Some(("8.8.8.8", 53)));
        assert_eq!(split_host_port("[::1]:853"), Some(("::1", 853)));
        assert_eq!(split_host_port("dns.example"), None);
        assert_eq!(split_host_port("2001:db8::1"), None);
    }

    #[test]
    fn test_with_default_port() {
        assert_eq!(with_default_port("1.1.1.1", 53), "1.1.1.1:53");
        assert_eq!(with_default_port("1.1.1.1:5353", 53), "1.1.1.1:5353");
        assert_eq!(with_default_port("2001:db8::1", 53), "[2001:db8::1]:53");
    }
}
