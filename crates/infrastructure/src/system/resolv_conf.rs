use ferrous_lookup_domain::LookupError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Reader for the `nameserver` entries of a resolv.conf file.
pub struct ResolvConfReader {
    path: PathBuf,
}

impl ResolvConfReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Configured resolver addresses, in file order.
    pub async fn nameservers(&self) -> Result<Vec<String>, LookupError> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            LookupError::configuration(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let servers = parse_nameservers(&content);
        debug!(path = %self.path.display(), count = servers.len(), "resolv.conf parsed");
        Ok(servers)
    }
}

impl Default for ResolvConfReader {
    fn default() -> Self {
        Self::new("/etc/resolv.conf")
    }
}

/// Collects the first token after every line starting with `nameserver`.
pub fn parse_nameservers(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| line.starts_with("nameserver"))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match fields.next() {
                Some("nameserver") => fields.next().map(str::to_string),
                _ => None,
            }
        })
        .collect()
}
