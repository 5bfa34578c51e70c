pub mod answer_format;
pub mod question_builder;
pub mod record_type_map;

pub use answer_format::{answer_string, answer_strings, fqdn};
pub use question_builder::QuestionBuilder;
pub use record_type_map::RecordTypeMapper;
