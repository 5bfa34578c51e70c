mod helpers;

use ferrous_lookup_application::use_cases::CheckDnssecSupportUseCase;
use ferrous_lookup_domain::LookupError;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::RecordType as WireType;
use helpers::*;
use std::sync::Arc;

#[tokio::test]
async fn test_dnskey_answer_means_supported() {
    let mock = MockDnsExchanger::new();
    mock.set_answers("example.com", WireType::DNSKEY, vec![example_dnskey_record()]);

    let supported = CheckDnssecSupportUseCase::new(Arc::new(mock.clone()))
        .execute("example.com", None)
        .await
        .unwrap();

    assert!(supported);

    let question = &mock.questions()[0];
    assert_eq!(question.queries()[0].query_type(), WireType::DNSKEY);
    let edns = question.extensions().as_ref().unwrap();
    assert!(edns.flags().dnssec_ok);
}

#[tokio::test]
async fn test_no_dnskey_means_unsupported() {
    let mock = MockDnsExchanger::new();
    mock.set_answers(
        "plain.example",
        WireType::DNSKEY,
        vec![a_record("plain.example.", "192.0.2.1")],
    );

    let use_case = CheckDnssecSupportUseCase::new(Arc::new(mock));

    assert!(!use_case.execute("plain.example", None).await.unwrap());
    assert!(!use_case.execute("empty.example", None).await.unwrap());
}

#[tokio::test]
async fn test_failure_rcode_propagates() {
    let mock = MockDnsExchanger::new();
    mock.set_rcode("broken.example", WireType::DNSKEY, ResponseCode::ServFail);
    mock.set_rcode("missing.example", WireType::DNSKEY, ResponseCode::NXDomain);

    let use_case = CheckDnssecSupportUseCase::new(Arc::new(mock));

    let err = use_case.execute("broken.example", None).await.unwrap_err();
    assert_eq!(err, LookupError::Rcode { rcode: 2 });

    let err = use_case.execute("missing.example", None).await.unwrap_err();
    assert!(err.is_name_error());
}

#[tokio::test]
async fn test_empty_domain_is_unsupported_without_io() {
    let mock = Arc::new(MockDnsExchanger::forbidding_io());

    let supported = CheckDnssecSupportUseCase::new(mock)
        .execute("", None)
        .await
        .unwrap();

    assert!(!supported);
}
