//! Question message construction.

use super::answer_format::fqdn;
use super::record_type_map::RecordTypeMapper;
use ferrous_lookup_domain::{LookupError, RecordType};
use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::opt::{EdnsCode, EdnsOption};
use hickory_proto::rr::{DNSClass, Name};
use std::str::FromStr;

/// Buffer size advertised by the DNSSEC probe's OPT record.
pub const DNSSEC_PROBE_PAYLOAD: u16 = 4096;

pub struct QuestionBuilder;

impl QuestionBuilder {
    /// Recursive query for `(domain, record_type)` with a random ID.
    ///
    /// The name is made fully qualified. When `edns_payload` is set an OPT
    /// record advertising that buffer size is attached.
    pub fn build(
        domain: &str,
        record_type: RecordType,
        edns_payload: Option<u16>,
    ) -> Result<Message, LookupError> {
        if record_type.code() == 0 {
            return Err(LookupError::configuration("unset record type"));
        }

        let name = Name::from_str(&fqdn(domain)).map_err(|e| {
            LookupError::configuration(format!("Invalid domain '{}': {}", domain, e))
        })?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(RecordTypeMapper::to_hickory(record_type));
        query.set_query_class(DNSClass::IN);

        let mut message = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        if let Some(payload) = edns_payload {
            let edns = message.extensions_mut().get_or_insert_with(Edns::new);
            edns.set_max_payload(payload);
        }

        Ok(message)
    }

    /// DNSKEY query carrying an OPT record with DNSSEC OK and an empty
    /// COOKIE option.
    pub fn build_dnssec_probe(domain: &str) -> Result<Message, LookupError> {
        let mut message = Self::build(domain, RecordType::DNSKEY, None)?;

        let edns = message.extensions_mut().get_or_insert_with(Edns::new);
        edns.set_max_payload(DNSSEC_PROBE_PAYLOAD);
        edns.set_dnssec_ok(true);
        edns.options_mut()
            .insert(EdnsOption::Unknown(u16::from(EdnsCode::Cookie), Vec::new()));

        Ok(message)
    }
}
