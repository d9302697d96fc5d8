pub mod pagination;
pub mod query;
pub mod removal;
pub mod response;

pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use removal::{ForceDeleteQuery, RemovalOutcome};
pub use response::ApiResponse;
