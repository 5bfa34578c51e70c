use super::GetAnswersUseCase;
use crate::ports::{DnsExchanger, ExchangeContext};
use ferrous_lookup_domain::{LookupError, RecordType};
use std::sync::Arc;

/// SOA probe: NXDOMAIN means the name does not exist, any other response
/// code is an error.
#[derive(Clone)]
pub struct DomainExistsUseCase {
    answers: GetAnswersUseCase,
}

impl DomainExistsUseCase {
    pub fn new(exchanger: Arc<dyn DnsExchanger>) -> Self {
        Self {
            answers: GetAnswersUseCase::new(exchanger),
        }
    }

    pub async fn execute(
        &self,
        domain: &str,
        ctx: Option<&mut ExchangeContext>,
    ) -> Result<bool, LookupError> {
        if domain.is_empty() {
            return Ok(false);
        }

        match self.answers.execute(domain, RecordType::SOA, ctx).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_name_error() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
