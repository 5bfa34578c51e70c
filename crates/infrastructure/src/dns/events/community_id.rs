//! Community ID flow hashing, version 1.

use base64::{engine::general_purpose::STANDARD, Engine};
use sha1::Digest as Sha1Digest;
use std::net::{IpAddr, SocketAddr};

pub const IANA_TCP: u8 = 6;
pub const IANA_UDP: u8 = 17;

/// `1:` followed by the base64 SHA-1 of the ordered flow tuple.
///
/// `None` when the endpoints belong to different address families.
pub fn community_id(client: SocketAddr, server: SocketAddr, protocol: u8, seed: u16) -> Option<String> {
    let (src, dst) = if (client.ip(), client.port()) <= (server.ip(), server.port()) {
        (client, server)
    } else {
        (server, client)
    };

    let mut hasher = sha1::Sha1::new();
    hasher.update(seed.to_be_bytes());
    match (src.ip(), dst.ip()) {
        (IpAddr::V4(a), IpAddr::V4(b)) => {
            hasher.update(a.octets());
            hasher.update(b.octets());
        }
        (IpAddr::V6(a), IpAddr::V6(b)) => {
            hasher.update(a.octets());
            hasher.update(b.octets());
        }
        _ => return None,
    }
    hasher.update([protocol, 0]);
    hasher.update(src.port().to_be_bytes());
    hasher.update(dst.port().to_be_bytes());

    Some(format!("1:{}", STANDARD.encode(hasher.finalize())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> SocketAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_known_tcp_flow() {
        let id = community_id(
            addr("128.232.110.120:34855"),
            addr("66.35.250.204:80"),
            IANA_TCP,
            0,
        );
        assert_eq!(id.as_deref(), Some("1:LQU9qZlK+B5F3KDmev6m5PMibrg="));
    }

    #[test]
    fn test_direction_does_not_matter() {
        let client = addr("192.168.1.52:54585");
        let server = addr("8.8.8.8:53");
        assert_eq!(
            community_id(client, server, IANA_UDP, 0),
            community_id(server, client, IANA_UDP, 0)
        );
    }

    #[test]
    fn test_mixed_families_have_no_id() {
        assert!(community_id(addr("10.0.0.1:5000"), addr("[::1]:53"), IANA_UDP, 0).is_none());
    }

    #[test]
    fn test_seed_changes_hash() {
        let client = addr("10.0.0.1:5000");
        let server = addr("10.0.0.2:53");
        assert_ne!(
            community_id(client, server, IANA_UDP, 0),
            community_id(client, server, IANA_UDP, 1)
        );
    }
}
