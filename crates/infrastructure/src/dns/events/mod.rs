pub mod community_id;
pub mod record;

pub use community_id::community_id;
pub use record::{DnsAnswer, DnsEvent, DnsInfo, DnsQuestion, Endpoint, NetworkInfo};
