//! Ferrous Lookup Domain Layer
pub mod active_result;
pub mod client_config;
pub mod config;
pub mod errors;
pub mod network;
pub mod rcode;
pub mod record_type;

pub use active_result::ActiveResult;
pub use client_config::ClientConfig;
pub use config::{CliOverrides, Config, ConfigError, LogFormat, LoggingConfig, ResolverConfig};
pub use errors::{LookupError, QuicPhase};
pub use network::{split_host_port, with_default_port, Network};
pub use record_type::RecordType;
