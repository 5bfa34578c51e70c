use ferrous_lookup_domain::{LookupError, RecordType};
use std::str::FromStr;

#[test]
fn test_codes_match_iana_assignments() {
    assert_eq!(RecordType::A.code(), 1);
    assert_eq!(RecordType::AAAA.code(), 28);
    assert_eq!(RecordType::MX.code(), 15);
    assert_eq!(RecordType::DNSKEY.code(), 48);
    assert_eq!(RecordType::OPT.code(), 41);
    assert_eq!(RecordType::from_code(6), RecordType::SOA);
}

#[test]
fn test_unknown_code_is_preserved() {
    let rt = RecordType::from_code(65280);
    assert_eq!(rt, RecordType::Unknown(65280));
    assert_eq!(rt.code(), 65280);
    assert_eq!(rt.to_string(), "TYPE65280");
}

#[test]
fn test_zero_code_is_a_configuration_error() {
    let err = RecordType::try_from(0u16).unwrap_err();
    assert!(matches!(err, LookupError::Configuration(_)));
    assert_eq!(RecordType::try_from(16u16).unwrap(), RecordType::TXT);
}

#[test]
fn test_from_str_is_case_insensitive() {
    assert_eq!(RecordType::from_str("txt").unwrap(), RecordType::TXT);
    assert_eq!(RecordType::from_str("DnsKey").unwrap(), RecordType::DNSKEY);
    assert_eq!(RecordType::from_str("type99").unwrap(), RecordType::Unknown(99));
    assert!(RecordType::from_str("TYPE0").is_err());
    assert!(RecordType::from_str("BOGUS").is_err());
}
