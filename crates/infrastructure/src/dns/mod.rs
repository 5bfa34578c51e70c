pub mod client;
pub mod events;
pub mod message_ttl;
pub mod transport;

pub use client::{serialize_message, DnsClient};
pub use events::DnsEvent;
pub use message_ttl::{apply_remaining_ttl, effective_message_ttl, header_flags};
