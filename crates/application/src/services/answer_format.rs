use hickory_proto::rr::{RData, Record};

/// `domain` with a trailing dot.
pub fn fqdn(domain: &str) -> String {
    if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{}.", domain)
    }
}

/// Semantic string of one answer record.
///
/// Addresses become their textual IP, MX/NS/CNAME their target host and TXT
/// the concatenation of its character-strings. Other types yield `None`.
pub fn answer_string(record: &Record) -> Option<String> {
    let value = match record.data() {
        RData::A(a) => a.0.to_string(),
        RData::AAAA(aaaa) => aaaa.0.to_string(),
        RData::MX(mx) => mx.exchange().to_utf8(),
        RData::NS(ns) => ns.0.to_utf8(),
        RData::CNAME(cname) => cname.0.to_utf8(),
        RData::TXT(txt) => txt_string(txt.txt_data()),
        _ => return None,
    };
    (!value.is_empty()).then_some(value)
}

pub fn answer_strings(records: &[Record]) -> Vec<String> {
    records.iter().filter_map(answer_string).collect()
}

fn txt_string(parts: &[Box<[u8]>]) -> String {
    let joined: Vec<u8> = parts.iter().flat_map(|part| part.iter().copied()).collect();
    String::from_utf8_lossy(&joined).into_owned()
}
