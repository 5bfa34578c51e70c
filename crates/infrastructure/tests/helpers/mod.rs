#![allow(dead_code)]
pub mod builders;
pub mod dns_server_mock;

pub use builders::{client_for, question};
pub use dns_server_mock::{
    silent_udp_server, MockDnsServer, CUT_LABEL, EMPTY_LABEL, MISSING_LABEL, TRUNCATED_LABEL,
};
