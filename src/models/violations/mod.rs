pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{Violation, ViolationCategory, ViolationDetail, ViolationLevel, ViolationType};
