#![allow(dead_code)]

mod mock_exchanger;
mod records;

pub use mock_exchanger::MockDnsExchanger;
pub use records::*;
