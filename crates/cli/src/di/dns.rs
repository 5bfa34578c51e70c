use anyhow::Context;
use ferrous_lookup_application::ports::DnsExchanger;
use ferrous_lookup_domain::Config;
use ferrous_lookup_infrastructure::dns::DnsClient;
use std::sync::Arc;
use tracing::info;

pub struct DnsServices {
    pub exchanger: Arc<dyn DnsExchanger>,
}

impl DnsServices {
    /// Uses the configured resolver when one is set, otherwise the first
    /// nameserver listed in the system resolver configuration.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let resolver = &config.resolver;
        let client_config = resolver.client_config();

        let client = match resolver.resolver_address() {
            Some(address) => DnsClient::with_address(&address, client_config)
                .with_context(|| format!("invalid dns server '{}'", address))?,
            None => DnsClient::from_resolv_conf(
                &resolver.resolv_conf,
                resolver.default_port,
                client_config,
            )
            .await
            .with_context(|| {
                format!(
                    "no dns server configured and none found in {}",
                    resolver.resolv_conf
                )
            })?,
        };

        info!(
            server = client.address(),
            network = %resolver.network,
            "DNS client ready"
        );

        Ok(Self {
            exchanger: Arc::new(client),
        })
    }
}
