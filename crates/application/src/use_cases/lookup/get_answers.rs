use crate::ports::{DnsExchanger, ExchangeContext};
use crate::services::QuestionBuilder;
use ferrous_lookup_domain::{rcode, LookupError, RecordType};
use hickory_proto::op::Message;
use hickory_proto::rr::Record;
use std::sync::Arc;
use tracing::debug;

/// Answer section of one logical exchange.
///
/// Any response code other than NOERROR, NXDOMAIN included, is returned as
/// `LookupError::Rcode`. Use `execute_or_empty` to read NXDOMAIN as an empty
/// answer.
#[derive(Clone)]
pub struct GetAnswersUseCase {
    exchanger: Arc<dyn DnsExchanger>,
}

impl GetAnswersUseCase {
    pub fn new(exchanger: Arc<dyn DnsExchanger>) -> Self {
        Self { exchanger }
    }

    pub fn exchanger(&self) -> &Arc<dyn DnsExchanger> {
        &self.exchanger
    }

    /// Exchanges a caller-built question.
    pub async fn with_message(
        &self,
        question: &Message,
        ctx: Option<&mut ExchangeContext>,
    ) -> Result<Vec<Record>, LookupError> {
        ensure_server(self.exchanger.as_ref())?;

        let mut response = self.exchanger.exchange(question, ctx).await?;

        let code = u16::from(response.response_code());
        if code != rcode::SUCCESS {
            debug!(
                server = %self.exchanger.server(),
                rcode = code,
                "Unsuccessful response code"
            );
            return Err(LookupError::Rcode { rcode: code });
        }

        Ok(response.take_answers())
    }

    /// Builds a recursive question for `(domain, record_type)` and exchanges
    /// it. An empty domain yields no records without any I/O.
    pub async fn execute(
        &self,
        domain: &str,
        record_type: RecordType,
        ctx: Option<&mut ExchangeContext>,
    ) -> Result<Vec<Record>, LookupError> {
        if domain.is_empty() {
            return Ok(Vec::new());
        }
        ensure_server(self.exchanger.as_ref())?;

        let question =
            QuestionBuilder::build(domain, record_type, self.exchanger.config().edns_payload())?;
        self.with_message(&question, ctx).await
    }

    pub async fn execute_or_empty(
        &self,
        domain: &str,
        record_type: RecordType,
        ctx: Option<&mut ExchangeContext>,
    ) -> Result<Vec<Record>, LookupError> {
        match self.execute(domain, record_type, ctx).await {
            Err(e) if e.is_name_error() => {
                debug!(domain = %domain, record_type = %record_type, "NXDOMAIN, no records");
                Ok(Vec::new())
            }
            other => other,
        }
    }
}

pub(crate) fn ensure_server(exchanger: &dyn DnsExchanger) -> Result<(), LookupError> {
    if exchanger.server().trim().is_empty() {
        return Err(LookupError::configuration("empty dns server"));
    }
    Ok(())
}
