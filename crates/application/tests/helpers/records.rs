use hickory_proto::op::Message;
use hickory_proto::rr::rdata::{A, AAAA, CNAME, MX, TXT};
use hickory_proto::rr::{Name, RData, Record};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

fn name(s: &str) -> Name {
    Name::from_str(s).unwrap()
}

pub fn a_record(owner: &str, ip: &str) -> Record {
    let ip: Ipv4Addr = ip.parse().unwrap();
    Record::from_rdata(name(owner), 300, RData::A(A(ip)))
}

pub fn aaaa_record(owner: &str, ip: &str) -> Record {
    let ip: Ipv6Addr = ip.parse().unwrap();
    Record::from_rdata(name(owner), 300, RData::AAAA(AAAA(ip)))
}

pub fn cname_record(owner: &str, target: &str) -> Record {
    Record::from_rdata(name(owner), 300, RData::CNAME(CNAME(name(target))))
}

pub fn mx_record(owner: &str, preference: u16, exchange: &str) -> Record {
    Record::from_rdata(
        name(owner),
        300,
        RData::MX(MX::new(preference, name(exchange))),
    )
}

pub fn txt_record(owner: &str, parts: &[&str]) -> Record {
    let parts = parts.iter().map(|p| p.to_string()).collect();
    Record::from_rdata(name(owner), 300, RData::TXT(TXT::new(parts)))
}

/// DNSKEY answer for `example.com.` (flags 257, ECDSAP256SHA256) decoded
/// from hand-written wire bytes.
pub fn example_dnskey_record() -> Record {
    let mut wire: Vec<u8> = vec![
        0x12, 0x34, // id
        0x81, 0x80, // QR RD RA, NOERROR
        0x00, 0x01, // qdcount
        0x00, 0x01, // ancount
        0x00, 0x00, // nscount
        0x00, 0x00, // arcount
        0x07, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 0x03, b'c', b'o', b'm', 0x00,
        0x00, 0x30, // DNSKEY
        0x00, 0x01, // IN
        0xc0, 0x0c, // name pointer
        0x00, 0x30, // DNSKEY
        0x00, 0x01, // IN
        0x00, 0x00, 0x0e, 0x10, // ttl 3600
        0x00, 0x44, // rdlength 68
        0x01, 0x01, // flags 257
        0x03, // protocol
        0x0d, // algorithm 13
    ];
    wire.extend((0u8..64).map(|i| i.wrapping_mul(7).wrapping_add(1)));

    let message = Message::from_vec(&wire).unwrap();
    message.answers()[0].clone()
}
