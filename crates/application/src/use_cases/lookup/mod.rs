mod domain_exists;
mod get_answer_strings;
mod get_answers;
mod get_prefixed_txt;

pub use domain_exists::DomainExistsUseCase;
pub use get_answer_strings::GetAnswerStringsUseCase;
pub use get_answers::GetAnswersUseCase;
pub(crate) use get_answers::ensure_server;
pub use get_prefixed_txt::GetPrefixedTxtUseCase;
