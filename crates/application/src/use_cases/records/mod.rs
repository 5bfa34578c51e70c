mod get_active_records;

pub use get_active_records::GetActiveRecordsUseCase;
