use ferrous_lookup_domain::LookupError;
use std::net::SocketAddr;
use std::time::Duration;

/// Resolves a hostname to all its IP addresses (IPv4 + IPv6) through the
/// system resolver.
pub async fn resolve_all(
    hostname: &str,
    port: u16,
    timeout: Duration,
) -> Result<Vec<SocketAddr>, LookupError> {
    let target = format!("{}:{}", hostname, port);

    let addrs_iter = tokio::time::timeout(timeout, tokio::net::lookup_host(&target))
        .await
        .map_err(|_| LookupError::TransportTimeout {
            server: target.clone(),
        })?
        .map_err(|e| LookupError::transport(&target, format!("host lookup failed: {}", e)))?;

    let addrs: Vec<SocketAddr> = addrs_iter.collect();

    if addrs.is_empty() {
        return Err(LookupError::transport(&target, "no addresses found"));
    }

    Ok(addrs)
}
