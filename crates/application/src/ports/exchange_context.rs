use chrono::{DateTime, Utc};
use hickory_proto::op::{Message, ResponseCode};
use serde::Serialize;
use std::net::SocketAddr;

/// Negotiated parameters of the TLS session an exchange ran over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TlsSummary {
    pub version: Option<String>,
    pub cipher: Option<String>,
    pub next_protocol: Option<String>,
    pub server_name: Option<String>,
    pub peer_certificates: usize,
    pub established: bool,
    pub client_initiated: bool,
}

/// Transport metadata of the most recent physical round trip.
///
/// Pass one per concurrent branch; the exchanger overwrites every field on
/// each round trip.
#[derive(Debug, Clone, Default)]
pub struct ExchangeContext {
    pub time: Option<DateTime<Utc>>,
    pub client_address: Option<SocketAddr>,
    pub server_address: Option<String>,
    pub transport: Option<&'static str>,
    pub question_message: Option<Message>,
    pub answer_message: Option<Message>,
    pub tls: Option<TlsSummary>,
}

impl ExchangeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_populated(&self) -> bool {
        self.time.is_some()
    }

    /// Socket address of the server when it was given as an IP literal.
    pub fn server_socket_addr(&self) -> Option<SocketAddr> {
        self.server_address.as_deref()?.parse().ok()
    }
}

/// One `ExchangeContext` per branch of an active-records lookup.
#[derive(Debug, Clone, Default)]
pub struct ActiveRecordsContexts {
    pub a: ExchangeContext,
    pub aaaa: ExchangeContext,
    pub mx: ExchangeContext,
}

impl ActiveRecordsContexts {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first branch (A, AAAA, MX order) that ran but did not get a
    /// successful answer.
    pub fn failed(&self) -> Option<&ExchangeContext> {
        [&self.a, &self.aaaa, &self.mx].into_iter().find(|ctx| {
            ctx.is_populated()
                && !ctx.answer_message.as_ref().is_some_and(|answer| {
                    matches!(
                        answer.response_code(),
                        ResponseCode::NoError | ResponseCode::NXDomain
                    )
                })
        })
    }
}
