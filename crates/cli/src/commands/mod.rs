mod active_records;
mod dnssec_support;
mod fanout;
mod input;
mod txt_retriever;

pub use active_records::run_active_records;
pub use dnssec_support::run_dnssec_support;
pub use input::read_domains;
pub use txt_retriever::run_txt_retriever;
