//! Mapping between `ferrous_lookup_domain::RecordType` and
//! `hickory_proto::rr::RecordType`.

use ferrous_lookup_domain::RecordType;
use hickory_proto::rr::RecordType as HickoryRecordType;

pub struct RecordTypeMapper;

impl RecordTypeMapper {
    pub fn to_hickory(record_type: RecordType) -> HickoryRecordType {
        match record_type {
            RecordType::A => HickoryRecordType::A,
            RecordType::NS => HickoryRecordType::NS,
            RecordType::CNAME => HickoryRecordType::CNAME,
            RecordType::SOA => HickoryRecordType::SOA,
            RecordType::PTR => HickoryRecordType::PTR,
            RecordType::MX => HickoryRecordType::MX,
            RecordType::TXT => HickoryRecordType::TXT,
            RecordType::AAAA => HickoryRecordType::AAAA,
            RecordType::SRV => HickoryRecordType::SRV,
            RecordType::OPT => HickoryRecordType::OPT,
            RecordType::DS => HickoryRecordType::DS,
            RecordType::RRSIG => HickoryRecordType::RRSIG,
            RecordType::NSEC => HickoryRecordType::NSEC,
            RecordType::DNSKEY => HickoryRecordType::DNSKEY,
            RecordType::CAA => HickoryRecordType::CAA,
            RecordType::Unknown(code) => HickoryRecordType::from(code),
        }
    }

    pub fn from_hickory(hickory_type: HickoryRecordType) -> RecordType {
        RecordType::from_code(u16::from(hickory_type))
    }
}
