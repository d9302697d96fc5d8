pub mod auth;

pub mod teachers;

pub mod students;

pub mod violations;

pub mod sanction_types;

pub mod cases;

pub mod reports;

pub mod system;

pub use auth::configure_auth_routes;
pub use cases::configure_case_routes;
pub use reports::configure_report_routes;
pub use sanction_types::configure_sanction_type_routes;
pub use students::configure_student_routes;
pub use system::configure_system_routes;
pub use teachers::configure_teacher_routes;
pub use violations::configure_violation_routes;
