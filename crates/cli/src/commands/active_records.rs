use super::fanout::fan_out;
use ferrous_lookup_application::ports::{ActiveRecordsContexts, ExchangeContext};
use ferrous_lookup_application::use_cases::GetActiveRecordsUseCase;
use ferrous_lookup_domain::ActiveResult;
use std::sync::Arc;
use tracing::warn;

pub async fn run_active_records(
    use_case: Arc<GetActiveRecordsUseCase>,
    domains: Vec<String>,
    concurrency: usize,
) -> anyhow::Result<()> {
    let job = move |domain: String, ctx: ExchangeContext| {
        let use_case = Arc::clone(&use_case);
        async move {
            let mut contexts = ActiveRecordsContexts::new();
            let result = use_case.execute(&domain, Some(&mut contexts)).await;
            let reported = match &result {
                Ok(_) => ctx,
                Err(_) => contexts.failed().cloned().unwrap_or(ctx),
            };
            (result, reported)
        }
    };

    fan_out(domains, concurrency, job, |outcome| {
        let Some((domain, result)) =
            outcome.ok_or_log("An error occurred when retrieving active records.")
        else {
            return;
        };
        match format_line(&result) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!(domain = %domain, error = %e, "Failed to serialize active records"),
        }
    })
    .await
}

fn format_line(result: &ActiveResult) -> serde_json::Result<String> {
    serde_json::to_string(result)
}
