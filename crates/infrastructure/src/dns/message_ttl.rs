//! Header flag and TTL helpers over complete response messages.

use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{RData, Record, RecordType};

/// Set header flags in the order AA, AD, CD, DO, RA, RD, TC. DO comes from
/// the OPT pseudo-record.
pub fn header_flags(message: &Message) -> Vec<&'static str> {
    let dnssec_ok = message
        .extensions()
        .as_ref()
        .is_some_and(|edns| edns.flags().dnssec_ok);

    [
        ("AA", message.authoritative()),
        ("AD", message.authentic_data()),
        ("CD", message.checking_disabled()),
        ("DO", dnssec_ok),
        ("RA", message.recursion_available()),
        ("RD", message.recursion_desired()),
        ("TC", message.truncated()),
    ]
    .into_iter()
    .filter_map(|(flag, set)| set.then_some(flag))
    .collect()
}

/// Overwrites the TTL of every record in the answer, authority and
/// additional sections.
pub fn apply_remaining_ttl(message: &mut Message, seconds: u32) {
    let rewrite = |mut records: Vec<Record>| {
        for record in records.iter_mut() {
            record.set_ttl(seconds);
        }
        records
    };

    let answers = rewrite(message.take_answers());
    let authority = rewrite(message.take_name_servers());
    let additionals = rewrite(message.take_additionals());

    message.insert_answers(answers);
    message.insert_name_servers(authority);
    message.insert_additionals(additionals);
}

/// Smallest TTL across all sections, ignoring OPT, SIG and TSIG.
///
/// For NXDOMAIN and empty-answer responses an authority SOA's MINIMUM also
/// bounds the result. `None` when no record contributes.
pub fn effective_message_ttl(message: &Message) -> Option<u32> {
    let mut min_ttl = message
        .answers()
        .iter()
        .chain(message.name_servers())
        .chain(message.additionals())
        .filter(|record| !is_meta_record(record))
        .map(Record::ttl)
        .min();

    if message.response_code() == ResponseCode::NXDomain || message.answers().is_empty() {
        for record in message.name_servers() {
            if let RData::SOA(soa) = record.data() {
                min_ttl = Some(min_ttl.map_or(soa.minimum(), |ttl| ttl.min(soa.minimum())));
            }
        }
    }

    min_ttl
}

fn is_meta_record(record: &Record) -> bool {
    matches!(
        record.record_type(),
        RecordType::OPT | RecordType::SIG | RecordType::TSIG
    )
}
