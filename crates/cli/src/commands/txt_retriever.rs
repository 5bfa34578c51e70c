use super::fanout::fan_out;
use ferrous_lookup_application::ports::ExchangeContext;
use ferrous_lookup_application::use_cases::GetPrefixedTxtUseCase;
use std::sync::Arc;

pub async fn run_txt_retriever(
    use_case: Arc<GetPrefixedTxtUseCase>,
    prefix: String,
    domains: Vec<String>,
    concurrency: usize,
) -> anyhow::Result<()> {
    let prefix: Arc<str> = Arc::from(prefix);

    let job = move |domain: String, mut ctx: ExchangeContext| {
        let use_case = Arc::clone(&use_case);
        let prefix = Arc::clone(&prefix);
        async move {
            let result = use_case.all(&domain, &prefix, Some(&mut ctx)).await;
            (result, ctx)
        }
    };

    fan_out(domains, concurrency, job, |outcome| {
        if let Some((domain, records)) =
            outcome.ok_or_log("An error occurred when retrieving prefixed TXT records.")
        {
            println!("{}", format_line(&domain, &records));
        }
    })
    .await
}

fn format_line(domain: &str, records: &[String]) -> String {
    let quoted: Vec<String> = records.iter().map(|r| format!("{:?}", r)).collect();
    format!("{}:{}", domain, quoted.join(","))
}
