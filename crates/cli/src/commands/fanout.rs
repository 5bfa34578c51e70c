//! Bounded fan-out of one lookup per input domain.

use ferrous_lookup_application::ports::ExchangeContext;
use ferrous_lookup_domain::LookupError;
use ferrous_lookup_infrastructure::dns::DnsEvent;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

pub struct Outcome<T> {
    pub domain: String,
    pub result: Result<T, LookupError>,
    pub context: ExchangeContext,
}

impl<T> Outcome<T> {
    /// Returns the value, or logs the failure with the exchange it happened
    /// on and returns `None`.
    pub fn ok_or_log(self, message: &str) -> Option<(String, T)> {
        match self.result {
            Ok(value) => Some((self.domain, value)),
            Err(e) => {
                let event = DnsEvent::from_context(&self.context).map(|event| event.to_json());
                warn!(
                    domain = %self.domain,
                    error = %e,
                    dns = event.as_deref(),
                    "{} Skipping.",
                    message
                );
                None
            }
        }
    }
}

/// Runs `job` for every domain with at most `concurrency` in flight. Each job
/// gets a fresh `ExchangeContext`. Outcomes are handed to `on_outcome` in
/// completion order.
pub async fn fan_out<T, F, Fut>(
    domains: Vec<String>,
    concurrency: usize,
    job: F,
    mut on_outcome: impl FnMut(Outcome<T>),
) -> anyhow::Result<()>
where
    T: Send + 'static,
    F: Fn(String, ExchangeContext) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = (Result<T, LookupError>, ExchangeContext)> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for domain in domains {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let job = job.clone();

        tasks.spawn(async move {
            let (result, context) = job(domain.clone(), ExchangeContext::new()).await;
            drop(permit);
            Outcome {
                domain,
                result,
                context,
            }
        });

        while let Some(joined) = tasks.try_join_next() {
            on_outcome(joined?);
        }
    }

    while let Some(joined) = tasks.join_next().await {
        on_outcome(joined?);
    }

    Ok(())
}
