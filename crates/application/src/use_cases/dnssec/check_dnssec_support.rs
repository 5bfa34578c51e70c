use crate::ports::{DnsExchanger, ExchangeContext};
use crate::services::QuestionBuilder;
use crate::use_cases::lookup::{ensure_server, GetAnswersUseCase};
use ferrous_lookup_domain::LookupError;
use hickory_proto::rr::RecordType;
use std::sync::Arc;
use tracing::debug;

/// Reports whether a zone publishes DNSKEY records.
///
/// Sends one DNSKEY query with DNSSEC OK and an empty COOKIE option. Every
/// failure, unsuccessful response codes included, is returned as an error.
#[derive(Clone)]
pub struct CheckDnssecSupportUseCase {
    answers: GetAnswersUseCase,
}

impl CheckDnssecSupportUseCase {
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
        ensure_server(self.answers.exchanger().as_ref())?;

        let question = QuestionBuilder::build_dnssec_probe(domain)?;
        let answers = self.answers.with_message(&question, ctx).await?;

        let supported = answers
            .iter()
            .any(|record| record.record_type() == RecordType::DNSKEY);

        debug!(domain = %domain, supported, answers = answers.len(), "DNSSEC probe complete");
        Ok(supported)
    }
}
