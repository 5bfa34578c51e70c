use serde::Serialize;

/// Merged A, AAAA and MX view of one domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActiveResult {
    pub domain: String,
    /// CNAME targets seen by exactly one of the A or AAAA lookups.
    pub cnames: Vec<String>,
    pub addresses: Vec<String>,
    pub mx_hosts: Vec<String>,
}

impl ActiveResult {
    pub fn empty(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cnames.is_empty() && self.addresses.is_empty() && self.mx_hosts.is_empty()
    }
}
