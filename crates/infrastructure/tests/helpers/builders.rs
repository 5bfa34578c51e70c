#![allow(dead_code)]
use ferrous_lookup_application::services::QuestionBuilder;
use ferrous_lookup_domain::{ClientConfig, Network, RecordType};
use ferrous_lookup_infrastructure::dns::DnsClient;
use hickory_proto::op::Message;
use std::time::Duration;

pub fn client_for(address: &str, network: Network) -> DnsClient {
    let config = ClientConfig {
        network,
        timeout: Duration::from_secs(2),
        ..Default::default()
    };
    DnsClient::with_address(address, config).unwrap()
}

pub fn question(domain: &str, record_type: RecordType) -> Message {
    QuestionBuilder::build(domain, record_type, None).unwrap()
}
