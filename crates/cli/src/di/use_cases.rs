use super::DnsServices;
use ferrous_lookup_application::use_cases::{
    CheckDnssecSupportUseCase, GetActiveRecordsUseCase, GetPrefixedTxtUseCase,
};
use ferrous_lookup_domain::Config;
use std::sync::Arc;

pub struct UseCases {
    pub check_dnssec: Arc<CheckDnssecSupportUseCase>,
    pub prefixed_txt: Arc<GetPrefixedTxtUseCase>,
    pub active_records: Arc<GetActiveRecordsUseCase>,
}

impl UseCases {
    pub fn new(config: &Config, dns: &DnsServices) -> Self {
        let max_cname_depth = config.resolver.max_cname_depth;

        Self {
            check_dnssec: Arc::new(CheckDnssecSupportUseCase::new(Arc::clone(&dns.exchanger))),
            prefixed_txt: Arc::new(GetPrefixedTxtUseCase::new(
                Arc::clone(&dns.exchanger),
                max_cname_depth,
            )),
            active_records: Arc::new(GetActiveRecordsUseCase::new(Arc::clone(&dns.exchanger))),
        }
    }
}
