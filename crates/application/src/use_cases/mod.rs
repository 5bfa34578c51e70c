pub mod dnssec;
pub mod lookup;
pub mod records;

pub use dnssec::CheckDnssecSupportUseCase;
pub use lookup::{
    DomainExistsUseCase, GetAnswerStringsUseCase, GetAnswersUseCase, GetPrefixedTxtUseCase,
};
pub use records::GetActiveRecordsUseCase;
