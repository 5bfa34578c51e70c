use super::GetAnswersUseCase;
use crate::ports::{DnsExchanger, ExchangeContext};
use crate::services::answer_string;
use ferrous_lookup_domain::{LookupError, RecordType};
use futures::future::{BoxFuture, FutureExt};
use hickory_proto::rr::RData;
use std::sync::Arc;
use tracing::debug;

/// Resolves answers into their semantic strings, optionally following CNAME
/// targets.
///
/// NXDOMAIN at any hop resolves to no strings.
#[derive(Clone)]
pub struct GetAnswerStringsUseCase {
    answers: GetAnswersUseCase,
    max_cname_depth: usize,
}

impl GetAnswerStringsUseCase {
    pub fn new(exchanger: Arc<dyn DnsExchanger>, max_cname_depth: usize) -> Self {
        Self {
            answers: GetAnswersUseCase::new(exchanger),
            max_cname_depth,
        }
    }

    /// With `recurse_cname` set (and `record_type` other than CNAME) every
    /// CNAME answer is replaced, in place, by the strings resolved for its
    /// target with the same record type.
    pub async fn execute(
        &self,
        domain: &str,
        record_type: RecordType,
        recurse_cname: bool,
        ctx: Option<&mut ExchangeContext>,
    ) -> Result<Vec<String>, LookupError> {
        self.resolve(domain.to_string(), record_type, recurse_cname, 0, ctx)
            .await
    }

    fn resolve<'a>(
        &'a self,
        domain: String,
        record_type: RecordType,
        recurse_cname: bool,
        depth: usize,
        mut ctx: Option<&'a mut ExchangeContext>,
    ) -> BoxFuture<'a, Result<Vec<String>, LookupError>> {
        async move {
            let records = self
                .answers
                .execute_or_empty(&domain, record_type, ctx.as_deref_mut())
                .await?;

            let follow = recurse_cname && record_type != RecordType::CNAME;
            let mut strings = Vec::with_capacity(records.len());

            for record in &records {
                if follow {
                    if let RData::CNAME(cname) = record.data() {
                        if depth >= self.max_cname_depth {
                            return Err(LookupError::CnameChainTooLong {
                                domain,
                                limit: self.max_cname_depth,
                            });
                        }

                        let target = cname.0.to_utf8();
                        debug!(domain = %domain, target = %target, depth, "Following CNAME");

                        let resolved = self
                            .resolve(
                                target,
                                record_type,
                                recurse_cname,
                                depth + 1,
                                ctx.as_deref_mut(),
                            )
                            .await?;
                        strings.extend(resolved);
                        continue;
                    }
                }

                if let Some(value) = answer_string(record) {
                    strings.push(value);
                }
            }

            Ok(strings)
        }
        .boxed()
    }
}
