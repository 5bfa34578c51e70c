use crate::ports::{ActiveRecordsContexts, DnsExchanger, ExchangeContext};
use crate::use_cases::lookup::{ensure_server, GetAnswersUseCase};
use ferrous_lookup_domain::{ActiveResult, LookupError, RecordType};
use hickory_proto::rr::RData;
use std::sync::{Arc, OnceLock};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::debug;

enum Branch {
    Addresses,
    MxHosts(Vec<String>),
}

/// Resolves A, AAAA and MX for one domain concurrently and merges them.
///
/// The CNAME list comes from whichever of the A or AAAA branches finishes
/// first; the other branch's CNAMEs are dropped, so which chain is reported
/// depends on scheduling. The call is all-or-nothing: every branch is
/// awaited and the first error to arrive is returned.
pub struct GetActiveRecordsUseCase {
    answers: GetAnswersUseCase,
}

impl GetActiveRecordsUseCase {
    pub fn new(exchanger: Arc<dyn DnsExchanger>) -> Self {
        Self {
            answers: GetAnswersUseCase::new(exchanger),
        }
    }

    /// With `contexts`, each branch's exchange metadata is written to its
    /// own slot, whether or not the call succeeds.
    pub async fn execute(
        &self,
        domain: &str,
        contexts: Option<&mut ActiveRecordsContexts>,
    ) -> Result<ActiveResult, LookupError> {
        if domain.is_empty() {
            return Ok(ActiveResult::empty(domain));
        }
        ensure_server(self.answers.exchanger().as_ref())?;

        let addresses: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let cnames: Arc<OnceLock<Vec<String>>> = Arc::new(OnceLock::new());

        let mut branches = JoinSet::new();

        for record_type in [RecordType::A, RecordType::AAAA] {
            let answers = self.answers.clone();
            let domain = domain.to_string();
            let addresses = Arc::clone(&addresses);
            let cnames = Arc::clone(&cnames);

            branches.spawn(async move {
                let mut ctx = ExchangeContext::new();
                let records = match answers
                    .execute_or_empty(&domain, record_type, Some(&mut ctx))
                    .await
                {
                    Ok(records) => records,
                    Err(e) => return (record_type, ctx, Err(e)),
                };

                let mut branch_cnames = Vec::new();
                for record in &records {
                    match record.data() {
                        RData::A(a) => addresses.lock().await.push(a.0.to_string()),
                        RData::AAAA(aaaa) => addresses.lock().await.push(aaaa.0.to_string()),
                        RData::CNAME(cname) => branch_cnames.push(cname.0.to_utf8()),
                        _ => {}
                    }
                }

                if cnames.set(branch_cnames).is_ok() {
                    debug!(domain = %domain, record_type = %record_type, "CNAME list taken from branch");
                }
                (record_type, ctx, Ok(Branch::Addresses))
            });
        }

        {
            let answers = self.answers.clone();
            let domain = domain.to_string();

            branches.spawn(async move {
                let mut ctx = ExchangeContext::new();
                let records = match answers
                    .execute_or_empty(&domain, RecordType::MX, Some(&mut ctx))
                    .await
                {
                    Ok(records) => records,
                    Err(e) => return (RecordType::MX, ctx, Err(e)),
                };

                let mut mx_hosts = Vec::new();
                for record in &records {
                    if let RData::MX(mx) = record.data() {
                        mx_hosts.push(mx.exchange().to_utf8());
                    }
                }
                (RecordType::MX, ctx, Ok(Branch::MxHosts(mx_hosts)))
            });
        }

        let mut first_error: Option<LookupError> = None;
        let mut mx_hosts = Vec::new();
        let mut contexts = contexts;

        while let Some(joined) = branches.join_next().await {
            match joined {
                Ok((record_type, ctx, outcome)) => {
                    if let Some(contexts) = contexts.as_deref_mut() {
                        match record_type {
                            RecordType::A => contexts.a = ctx,
                            RecordType::AAAA => contexts.aaaa = ctx,
                            _ => contexts.mx = ctx,
                        }
                    }
                    match outcome {
                        Ok(Branch::Addresses) => {}
                        Ok(Branch::MxHosts(hosts)) => mx_hosts = hosts,
                        Err(e) => {
                            first_error.get_or_insert(e);
                        }
                    }
                }
                Err(join_error) if join_error.is_panic() => {
                    std::panic::resume_unwind(join_error.into_panic());
                }
                Err(join_error) => {
                    first_error.get_or_insert(LookupError::transport(
                        self.answers.exchanger().server(),
                        join_error,
                    ));
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        let addresses = std::mem::take(&mut *addresses.lock().await);
        let cnames = cnames.get().cloned().unwrap_or_default();

        Ok(ActiveResult {
            domain: domain.to_string(),
            cnames,
            addresses,
            mx_hosts,
        })
    }
}
