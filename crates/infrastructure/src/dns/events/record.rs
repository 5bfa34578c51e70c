use super::community_id::{community_id, IANA_TCP, IANA_UDP};
use crate::dns::message_ttl::header_flags;
use ferrous_lookup_application::ports::{ExchangeContext, TlsSummary};
use ferrous_lookup_application::services::answer_string;
use ferrous_lookup_domain::{rcode, split_host_port};
use hickory_proto::op::{Message, MessageType, OpCode};
use hickory_proto::rr::{Record, RecordType};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};

/// Structured description of one exchange, ready to attach to a log line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DnsEvent {
    pub network: NetworkInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<Endpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<Endpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsSummary>,
    pub dns: DnsInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkInfo {
    pub protocol: &'static str,
    pub transport: &'static str,
    pub iana_number: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub community_id: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Endpoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl Endpoint {
    fn from_socket_addr(addr: SocketAddr) -> Self {
        Self {
            address: Some(addr.ip().to_string()),
            ip: Some(addr.ip().to_string()),
            domain: None,
            port: Some(addr.port()),
        }
    }

    /// Splits `host:port`; a host that is not an IP literal becomes the
    /// domain. Without a port nothing is filled in.
    fn parse(address: &str) -> Self {
        let Some((host, port)) = split_host_port(address) else {
            return Self::default();
        };
        let ip = host.parse::<IpAddr>().ok();
        Self {
            address: Some(host.to_string()),
            ip: ip.map(|ip| ip.to_string()),
            domain: ip.is_none().then(|| host.to_string()),
            port: Some(port),
        }
    }

    fn socket_addr(&self) -> Option<SocketAddr> {
        let ip = self.ip.as_deref()?.parse::<IpAddr>().ok()?;
        Some(SocketAddr::new(ip, self.port?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DnsInfo {
    pub header_flags: Vec<&'static str>,
    pub id: String,
    pub op_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<DnsQuestion>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<DnsAnswer>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resolved_ip: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_code: Option<String>,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DnsQuestion {
    pub name: String,
    pub class: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_level_domain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DnsAnswer {
    pub class: String,
    pub data: String,
    pub name: String,
    pub ttl: u32,
    #[serde(rename = "type")]
    pub record_type: String,
}

impl DnsEvent {
    /// Maps a stamped context. The answer message is preferred over the
    /// question; `None` when the context holds neither.
    pub fn from_context(ctx: &ExchangeContext) -> Option<Self> {
        let message = ctx
            .answer_message
            .as_ref()
            .or(ctx.question_message.as_ref())?;

        let (transport, iana) = match ctx.transport.map(str::to_ascii_lowercase).as_deref() {
            Some("tcp") => ("tcp", IANA_TCP),
            _ => ("udp", IANA_UDP),
        };

        let client = ctx.client_address.map(Endpoint::from_socket_addr);
        let server = ctx.server_address.as_deref().map(Endpoint::parse);

        let community_id = match (ctx.client_address, server.as_ref().and_then(Endpoint::socket_addr)) {
            (Some(client_addr), Some(server_addr)) => {
                community_id(client_addr, server_addr, iana, 0).into_iter().collect()
            }
            _ => Vec::new(),
        };

        Some(Self {
            network: NetworkInfo {
                protocol: "dns",
                transport,
                iana_number: iana.to_string(),
                community_id,
            },
            client,
            server,
            tls: ctx.tls.clone(),
            dns: DnsInfo::from_message(message),
        })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl DnsInfo {
    pub fn from_message(message: &Message) -> Self {
        let question = message.queries().first().map(|query| {
            let name = trim_root(&query.name().to_utf8());
            let (registered_domain, subdomain, top_level_domain) = domain_breakdown(&name);
            DnsQuestion {
                class: query.query_class().to_string(),
                record_type: query.query_type().to_string(),
                name,
                registered_domain,
                subdomain,
                top_level_domain,
            }
        });

        let answers: Vec<DnsAnswer> = message.answers().iter().map(DnsAnswer::from_record).collect();

        let mut resolved_ip: Vec<String> = Vec::new();
        for answer in message
            .answers()
            .iter()
            .filter(|r| matches!(r.record_type(), RecordType::A | RecordType::AAAA))
        {
            if let Some(ip) = answer_string(answer) {
                if !resolved_ip.contains(&ip) {
                    resolved_ip.push(ip);
                }
            }
        }

        let is_response = message.message_type() == MessageType::Response;
        let response_code = is_response.then(|| {
            let code = u16::from(message.response_code());
            rcode::name(code)
                .map(str::to_string)
                .unwrap_or_else(|| code.to_string())
        });

        Self {
            header_flags: header_flags(message),
            id: message.id().to_string(),
            op_code: op_code_name(message.op_code()),
            question,
            answers,
            resolved_ip,
            response_code,
            kind: if is_response { "answer" } else { "question" },
        }
    }
}

impl DnsAnswer {
    fn from_record(record: &Record) -> Self {
        Self {
            class: record.dns_class().to_string(),
            data: answer_string(record).unwrap_or_else(|| record.data().to_string()),
            name: trim_root(&record.name().to_utf8()),
            ttl: record.ttl(),
            record_type: record.record_type().to_string(),
        }
    }
}

fn trim_root(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_string()
}

fn op_code_name(op_code: OpCode) -> String {
    match u8::from(op_code) {
        0 => "QUERY".to_string(),
        1 => "IQUERY".to_string(),
        2 => "STATUS".to_string(),
        4 => "NOTIFY".to_string(),
        5 => "UPDATE".to_string(),
        other => other.to_string(),
    }
}

/// Label-based split into (registered domain, subdomain, top-level domain).
/// The registered domain is taken as the last two labels.
fn domain_breakdown(name: &str) -> (Option<String>, Option<String>, Option<String>) {
    let labels: Vec<&str> = name.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() < 2 {
        return (None, None, None);
    }

    let split = labels.len() - 2;
    let registered = labels[split..].join(".");
    let subdomain = (split > 0).then(|| labels[..split].join("."));
    let tld = labels[labels.len() - 1].to_string();

    (Some(registered), subdomain, Some(tld))
}
