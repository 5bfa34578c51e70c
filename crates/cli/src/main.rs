use clap::{Parser, Subcommand};
use ferrous_lookup_domain::{CliOverrides, Network};
use std::path::PathBuf;
use tracing::{debug, error};

mod bootstrap;
mod commands;
mod di;

#[derive(Parser)]
#[command(name = "ferrous-lookup")]
#[command(version)]
#[command(about = "Ferrous Lookup - bulk DNS lookups over UDP, TCP, TLS and QUIC")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Input file with one domain per line (stdin when absent)
    #[arg(long = "in", value_name = "FILE", global = true)]
    input: Option<PathBuf>,

    /// Number of concurrent lookups
    #[arg(long, default_value_t = 50, global = true)]
    num: usize,

    /// DNS server to query (host:port); defaults to the first resolv.conf nameserver
    #[arg(long, value_name = "HOST:PORT", global = true)]
    dns_server: Option<String>,

    /// Transport (udp, tcp, tcp-tls, quic)
    #[arg(long, global = true)]
    network: Option<Network>,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Print `domain:true|false` for whether each domain publishes signed DNSKEYs
    DnssecSupport,
    /// Print the TXT records of each domain that start with a prefix
    TxtRetriever {
        /// TXT record prefix, e.g. "v=spf1"
        #[arg(long)]
        prefix: String,
    },
    /// Print the A, AAAA and MX view of each domain as one JSON object per line
    ActiveRecords,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_server: cli.dns_server.clone(),
        network: cli.network,
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config)?;

    debug!("Starting Ferrous Lookup v{}", env!("CARGO_PKG_VERSION"));

    let dns = di::DnsServices::new(&config).await?;
    let use_cases = di::UseCases::new(&config, &dns);

    let domains = commands::read_domains(cli.input.as_deref()).await?;
    debug!(count = domains.len(), concurrency = cli.num, "Domains read");

    let result = match cli.command {
        Command::DnssecSupport => {
            commands::run_dnssec_support(use_cases.check_dnssec, domains, cli.num).await
        }
        Command::TxtRetriever { prefix } => {
            commands::run_txt_retriever(use_cases.prefixed_txt, prefix, domains, cli.num).await
        }
        Command::ActiveRecords => {
            commands::run_active_records(use_cases.active_records, domains, cli.num).await
        }
    };

    if let Err(e) = &result {
        error!(error = %e, "Lookup run aborted");
    }
    result
}
