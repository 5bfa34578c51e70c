use super::fanout::fan_out;
use ferrous_lookup_application::ports::ExchangeContext;
use ferrous_lookup_application::use_cases::CheckDnssecSupportUseCase;
use std::sync::Arc;

pub async fn run_dnssec_support(
    use_case: Arc<CheckDnssecSupportUseCase>,
    domains: Vec<String>,
    concurrency: usize,
) -> anyhow::Result<()> {
    let job = move |domain: String, mut ctx: ExchangeContext| {
        let use_case = Arc::clone(&use_case);
        async move {
            let result = use_case.execute(&domain, Some(&mut ctx)).await;
            (result, ctx)
        }
    };

    fan_out(domains, concurrency, job, |outcome| {
        if let Some((domain, supported)) =
            outcome.ok_or_log("An error occurred when checking DNSSEC support.")
        {
            println!("{}", format_line(&domain, supported));
        }
    })
    .await
}

fn format_line(domain: &str, supported: bool) -> String {
    format!("{}:{}", domain, supported)
}
