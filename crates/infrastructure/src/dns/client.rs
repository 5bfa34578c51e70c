use super::transport::{create_transport, Transport, TransportResponse};
use crate::system::ResolvConfReader;
use async_trait::async_trait;
use chrono::Utc;
use ferrous_lookup_application::ports::{DnsExchanger, ExchangeContext};
use ferrous_lookup_domain::{with_default_port, ClientConfig, LookupError, Network, QuicPhase};
use hickory_proto::op::Message;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

#[cfg(feature = "dns-over-quic")]
use super::transport::quic::{QuicOptions, QuicTransport};

/// Client handle: one resolver address plus the transport settings used for
/// every exchange against it. Holds no per-exchange state.
#[derive(Clone)]
pub struct DnsClient {
    address: Arc<str>,
    config: ClientConfig,
    #[cfg(feature = "dns-over-quic")]
    quic_options: Option<QuicOptions>,
}

impl DnsClient {
    pub fn with_address(address: &str, config: ClientConfig) -> Result<Self, LookupError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(LookupError::configuration("empty dns server"));
        }

        Ok(Self {
            address: Arc::from(address),
            config,
            #[cfg(feature = "dns-over-quic")]
            quic_options: None,
        })
    }

    /// Uses the first `nameserver` of a resolv.conf file, with
    /// `default_port` appended.
    pub async fn from_resolv_conf(
        path: impl AsRef<Path>,
        default_port: u16,
        config: ClientConfig,
    ) -> Result<Self, LookupError> {
        let reader = ResolvConfReader::new(path);
        let servers = reader.nameservers().await?;
        let first = servers.first().ok_or_else(|| {
            LookupError::configuration(format!(
                "no nameserver entries in {}",
                reader.path().display()
            ))
        })?;

        Self::with_address(&with_default_port(first, default_port), config)
    }

    /// Caller-supplied TLS / QUIC settings for DNS-over-QUIC exchanges.
    #[cfg(feature = "dns-over-quic")]
    pub fn with_quic_options(mut self, options: QuicOptions) -> Self {
        self.quic_options = Some(options);
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    async fn transport_for(&self, config: &ClientConfig) -> Result<Transport, LookupError> {
        #[cfg(feature = "dns-over-quic")]
        if let (Network::Quic, Some(options)) = (config.network, &self.quic_options) {
            let addr = super::transport::resolve_server(&self.address, config.timeout).await?;
            let server_name = super::transport::server_name_for(&self.address, config);
            return Ok(Transport::Quic(QuicTransport::with_options(
                addr,
                server_name.into(),
                options.clone(),
            )));
        }

        create_transport(&self.address, config).await
    }

    async fn send_over(
        &self,
        config: &ClientConfig,
        message_bytes: &[u8],
    ) -> Result<TransportResponse, LookupError> {
        let transport = self.transport_for(config).await?;
        debug!(
            server = %self.address,
            protocol = transport.protocol_name(),
            message_len = message_bytes.len(),
            "Sending DNS query"
        );
        transport.send(message_bytes, config.timeout).await
    }

    /// One physical exchange. The context is stamped whether or not it
    /// succeeds.
    ///
    /// A UDP datagram with TC set is `Reply::Truncated` even when the partial
    /// message does not decode.
    async fn round_trip(
        &self,
        config: &ClientConfig,
        question: &Message,
        question_bytes: &[u8],
        ctx: Option<&mut ExchangeContext>,
    ) -> Result<Reply, LookupError> {
        let mut truncated = false;
        let (answer, response) = match self.send_over(config, question_bytes).await {
            Ok(response) => {
                truncated = config.network == Network::Udp && has_tc_bit(&response.bytes);
                (decode_message(config.network, &response.bytes), Some(response))
            }
            Err(e) => (Err(e), None),
        };

        if let Some(ctx) = ctx {
            stamp_context(ctx, &self.address, config.network, question, &answer, response);
        }

        if truncated {
            if let Err(e) = &answer {
                debug!(server = %self.address, error = %e, "Truncated UDP response did not decode");
            }
            return Ok(Reply::Truncated);
        }

        answer.map(Reply::Complete)
    }
}

enum Reply {
    Complete(Message),
    Truncated,
}

#[async_trait]
impl DnsExchanger for DnsClient {
    async fn exchange(
        &self,
        question: &Message,
        mut ctx: Option<&mut ExchangeContext>,
    ) -> Result<Message, LookupError> {
        let question_bytes = serialize_message(question)?;

        let reply = self
            .round_trip(&self.config, question, &question_bytes, ctx.as_deref_mut())
            .await?;

        match reply {
            Reply::Complete(response) => Ok(response),
            Reply::Truncated => {
                warn!(
                    server = %self.address,
                    id = question.id(),
                    "Truncated UDP response, retrying over TCP"
                );
                let tcp_config = self.config.with_network(Network::Tcp);
                match self
                    .round_trip(&tcp_config, question, &question_bytes, ctx)
                    .await?
                {
                    Reply::Complete(response) => Ok(response),
                    Reply::Truncated => Err(LookupError::Decode(
                        "truncated response over TCP".to_string(),
                    )),
                }
            }
        }
    }

    fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn server(&self) -> &str {
        &self.address
    }
}

fn stamp_context(
    ctx: &mut ExchangeContext,
    address: &str,
    network: Network,
    question: &Message,
    answer: &Result<Message, LookupError>,
    response: Option<TransportResponse>,
) {
    let (client_address, remote_address, tls) = match response {
        Some(r) => (r.local_addr, r.remote_addr, r.tls),
        None => (None, None, None),
    };

    ctx.time = Some(Utc::now());
    ctx.client_address = client_address;
    ctx.server_address = Some(match (network, remote_address) {
        (Network::Quic, Some(remote)) => remote.to_string(),
        _ => address.to_string(),
    });
    ctx.transport = Some(network.context_transport());
    ctx.question_message = Some(question.clone());
    ctx.answer_message = answer.as_ref().ok().cloned();
    ctx.tls = tls;
}

/// TC flag straight from the wire header (third byte, bit 0x02).
fn has_tc_bit(bytes: &[u8]) -> bool {
    bytes.len() >= 4 && bytes[2] & 0x02 != 0
}

/// Serialize a Message to wire format bytes
pub fn serialize_message(message: &Message) -> Result<Vec<u8>, LookupError> {
    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);

    message
        .emit(&mut encoder)
        .map_err(|e| LookupError::Encode(e.to_string()))?;

    Ok(buf)
}

fn decode_message(network: Network, bytes: &[u8]) -> Result<Message, LookupError> {
    Message::from_vec(bytes).map_err(|e| match network {
        Network::Quic => LookupError::quic(QuicPhase::Unpack, e),
        _ => LookupError::Decode(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::op::{MessageType, OpCode};

    #[test]
    fn test_with_address_rejects_empty() {
        let err = DnsClient::with_address("  ", ClientConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, LookupError::Configuration(_)));
    }

    #[test]
    fn test_with_address_trims() {
        let client = DnsClient::with_address(" 9.9.9.9:53 ", ClientConfig::default()).unwrap();
        assert_eq!(client.address(), "9.9.9.9:53");
        assert_eq!(client.server(), "9.9.9.9:53");
    }

    #[test]
    fn test_decode_error_names_quic_unpack() {
        let err = decode_message(Network::Quic, &[0x00]).unwrap_err();
        assert!(matches!(
            err,
            LookupError::Quic {
                phase: QuicPhase::Unpack,
                ..
            }
        ));
        assert!(matches!(
            decode_message(Network::Udp, &[0x00]).unwrap_err(),
            LookupError::Decode(_)
        ));
    }

    #[test]
    fn test_tc_bit_read_from_raw_header() {
        let mut message = Message::new(9, MessageType::Response, OpCode::Query);
        message.set_truncated(true);
        let mut bytes = serialize_message(&message).unwrap();
        assert!(has_tc_bit(&bytes));

        bytes.truncate(5);
        assert!(has_tc_bit(&bytes));

        bytes[2] &= !0x02;
        assert!(!has_tc_bit(&bytes));
        assert!(!has_tc_bit(&[0x00, 0x09, 0x02]));
    }

    #[test]
    fn test_stamp_context_on_failure_keeps_question() {
        let question = Message::new(7, MessageType::Query, OpCode::Query);
        let mut ctx = ExchangeContext::new();
        let failed: Result<Message, LookupError> = Err(LookupError::TransportTimeout {
            server: "192.0.2.1:53".to_string(),
        });

        stamp_context(&mut ctx, "192.0.2.1:53", Network::TcpTls, &question, &failed, None);

        assert!(ctx.is_populated());
        assert_eq!(ctx.transport, Some("tcp"));
        assert_eq!(ctx.server_address.as_deref(), Some("192.0.2.1:53"));
        assert_eq!(ctx.question_message.as_ref().map(|m| m.id()), Some(7));
        assert!(ctx.answer_message.is_none());
        assert!(ctx.client_address.is_none());
    }
}
