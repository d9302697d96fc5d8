pub mod case_number;
pub mod extractor;
pub mod file_magic;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod pdf;
pub mod period;
pub mod sql;
pub mod validate;

pub use case_number::format_case_number;
pub use extractor::{SafeActionIdI64, SafeIDI64, SafeSettingKey};
pub use file_magic::{SpreadsheetFormat, detect_spreadsheet_format};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::{escape_like_pattern, like_contains};
