use anyhow::Context;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Reads one domain per line from `path`, or from stdin when no path is given.
pub async fn read_domains(path: Option<&Path>) -> anyhow::Result<Vec<String>> {
    match path {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open input file {}", path.display()))?;
            collect_domains(BufReader::new(file)).await
        }
        None => collect_domains(BufReader::new(tokio::io::stdin())).await,
    }
}

async fn collect_domains<R: AsyncBufRead + Unpin>(reader: R) -> anyhow::Result<Vec<String>> {
    let mut lines = reader.lines();
    let mut domains = Vec::new();

    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        let domain = line.trim();
        if !domain.is_empty() {
            domains.push(domain.to_string());
        }
    }

    Ok(domains)
}
