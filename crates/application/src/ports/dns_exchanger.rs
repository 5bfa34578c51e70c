use super::ExchangeContext;
use async_trait::async_trait;
use ferrous_lookup_domain::{ClientConfig, LookupError};
use hickory_proto::op::Message;

/// One logical DNS exchange against a single resolver.
///
/// Implementations return the response message whatever its rcode; callers
/// decide how to treat unsuccessful codes. When `ctx` is given it is
/// overwritten on every physical round trip, so after a UDP truncation
/// fallback it describes the TCP leg.
#[async_trait]
pub trait DnsExchanger: Send + Sync {
    async fn exchange(
        &self,
        question: &Message,
        ctx: Option<&mut ExchangeContext>,
    ) -> Result<Message, LookupError>;

    fn config(&self) -> &ClientConfig;

    fn server(&self) -> &str;
}
