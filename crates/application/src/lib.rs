//! Ferrous Lookup Application Layer
//!
//! Use cases over a `DnsExchanger` port: answer lookups, CNAME-following
//! string resolution, prefixed TXT retrieval, domain existence, active
//! record aggregation and DNSSEC probing.
pub mod ports;
pub mod services;
pub mod use_cases;
