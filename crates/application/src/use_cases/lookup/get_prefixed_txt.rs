use super::GetAnswerStringsUseCase;
use crate::ports::{DnsExchanger, ExchangeContext};
use ferrous_lookup_domain::{LookupError, RecordType};
use std::sync::Arc;

/// TXT strings starting with a literal prefix, such as `v=spf1` or
/// `v=DMARC1`. CNAMEs are followed.
#[derive(Clone)]
pub struct GetPrefixedTxtUseCase {
    strings: GetAnswerStringsUseCase,
}

impl GetPrefixedTxtUseCase {
    pub fn new(exchanger: Arc<dyn DnsExchanger>, max_cname_depth: usize) -> Self {
        Self {
            strings: GetAnswerStringsUseCase::new(exchanger, max_cname_depth),
        }
    }

    pub async fn all(
        &self,
        domain: &str,
        prefix: &str,
        ctx: Option<&mut ExchangeContext>,
    ) -> Result<Vec<String>, LookupError> {
        if prefix.is_empty() {
            return Err(LookupError::configuration("empty prefix"));
        }

        let strings = self
            .strings
            .execute(domain, RecordType::TXT, true, ctx)
            .await?;

        Ok(strings
            .into_iter()
            .filter(|value| value.starts_with(prefix))
            .collect())
    }

    /// First matching string in answer order.
    pub async fn first(
        &self,
        domain: &str,
        prefix: &str,
        ctx: Option<&mut ExchangeContext>,
    ) -> Result<Option<String>, LookupError> {
        Ok(self.all(domain, prefix, ctx).await?.into_iter().next())
    }
}
