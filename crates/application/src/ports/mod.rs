mod dns_exchanger;
mod exchange_context;

pub use dns_exchanger::DnsExchanger;
pub use exchange_context::{ActiveRecordsContexts, ExchangeContext, TlsSummary};
