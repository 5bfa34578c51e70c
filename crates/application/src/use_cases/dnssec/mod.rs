mod check_dnssec_support;

pub use check_dnssec_support::CheckDnssecSupportUseCase;
