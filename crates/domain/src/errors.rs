use crate::rcode;
use std::fmt;
use thiserror::Error;

/// Stage of a DNS-over-QUIC exchange that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuicPhase {
    Dial,
    StreamOpen,
    Write,
    ReadLength,
    ReadBody,
    Unpack,
}

impl QuicPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuicPhase::Dial => "dial",
            QuicPhase::StreamOpen => "stream-open",
            QuicPhase::Write => "write",
            QuicPhase::ReadLength => "read-length",
            QuicPhase::ReadBody => "read-body",
            QuicPhase::Unpack => "unpack",
        }
    }
}

impl fmt::Display for QuicPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error with {server}: {message}")]
    Transport { server: String, message: String },

    #[error("Transport timeout talking to {server}")]
    TransportTimeout { server: String },

    #[error("Unsuccessful rcode: {rcode}{}", rcode::suffix(.rcode))]
    Rcode { rcode: u16 },

    #[error("DNS message too large for length-prefixed framing: {length} bytes (max 65535)")]
    MessageTooLarge { length: usize },

    #[error("DNS-over-QUIC {phase} failed: {message}")]
    Quic { phase: QuicPhase, message: String },

    #[error("Failed to decode DNS message: {0}")]
    Decode(String),

    #[error("Failed to encode DNS message: {0}")]
    Encode(String),

    #[error("Resolver returned no message")]
    NilResponse,

    #[error("Response ID mismatch from {server}: expected {expected}, got {received}")]
    ResponseIdMismatch {
        server: String,
        expected: u16,
        received: u16,
    },

    #[error("CNAME chain for {domain} exceeds {limit} hops")]
    CnameChainTooLong { domain: String, limit: usize },
}

impl LookupError {
    pub fn configuration(message: impl Into<String>) -> Self {
        LookupError::Configuration(message.into())
    }

    pub fn transport(server: impl Into<String>, message: impl fmt::Display) -> Self {
        LookupError::Transport {
            server: server.into(),
            message: message.to_string(),
        }
    }

    pub fn quic(phase: QuicPhase, message: impl fmt::Display) -> Self {
        LookupError::Quic {
            phase,
            message: message.to_string(),
        }
    }

    /// The response code carried by an `Rcode` error.
    pub fn rcode(&self) -> Option<u16> {
        match self {
            LookupError::Rcode { rcode } => Some(*rcode),
            _ => None,
        }
    }

    /// `true` for the NXDOMAIN response code.
    pub fn is_name_error(&self) -> bool {
        self.rcode() == Some(rcode::NAME_ERROR)
    }

    /// `true` for DoQ length-prefix framing failures.
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            LookupError::MessageTooLarge { .. }
                | LookupError::Quic {
                    phase: QuicPhase::Write | QuicPhase::ReadLength | QuicPhase::ReadBody,
                    ..
                }
        )
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LookupError::Transport { .. }
                | LookupError::TransportTimeout { .. }
                | LookupError::Quic {
                    phase: QuicPhase::Dial | QuicPhase::StreamOpen,
                    ..
                }
        )
    }
}
