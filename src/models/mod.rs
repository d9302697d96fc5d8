//! 数据模型
//!
//! 按资源划分：`entities`（业务实体）、`requests`（请求体）、`responses`（响应体）。

pub mod auth;
pub mod cases;
pub mod common;
pub mod reports;
pub mod sanction_types;
pub mod sanctions;
pub mod students;
pub mod system;
pub mod users;
pub mod violations;

use std::sync::OnceLock;

pub use common::{
    ApiResponse, ForceDeleteQuery, PaginatedResponse, PaginationInfo, PaginationQuery,
    RemovalOutcome,
};

/// 进程启动时间
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

pub static APP_START_TIME: OnceLock<AppStartTime> = OnceLock::new();

/// API 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    ValidationFailed = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Gone = 1010,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2000,
    RefreshTokenMissing = 2001,
    RefreshTokenInvalid = 2002,

    // 教师账号
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserNameInvalid = 3002,
    UserEmailInvalid = 3003,
    UserPasswordInvalid = 3004,
    CanNotDeleteCurrentUser = 3005,

    // 学生
    StudentNotFound = 4000,
    StudentAlreadyExists = 4001,
    ImportFileMissingColumn = 4010,
    ImportFileParseFailed = 4011,
    ImportFileDataInvalid = 4012,
    FileUploadFailed = 4013,
    FileTypeNotAllowed = 4014,

    // 违规目录
    ViolationCategoryNotFound = 5000,
    ViolationCategoryInUse = 5001,
    ViolationNotFound = 5002,
    ViolationTypeNotFound = 5003,

    // 处分类型
    SanctionTypeNotFound = 6000,

    // 案件
    CaseNotFound = 7000,
    CaseAlreadyCompleted = 7001,
    CaseActionNotFound = 7002,
    CaseActionDeleted = 7003,
    SanctionNotFound = 7004,

    // 报表
    ReportNotFound = 8000,
    ReportGenerationFailed = 8001,

    // 系统设置
    SettingNotFound = 9000,
}

impl ErrorCode {
    /// 按错误类别给出默认业务码
    pub fn for_error(err: &crate::errors::SidisiplinError) -> Self {
        use crate::errors::SidisiplinError;

        match err {
            SidisiplinError::Validation(_) | SidisiplinError::DateParse(_) => {
                ErrorCode::ValidationFailed
            }
            SidisiplinError::NotFound(_) => ErrorCode::NotFound,
            SidisiplinError::Gone(_) => ErrorCode::Gone,
            SidisiplinError::Authentication(_) => ErrorCode::Unauthorized,
            SidisiplinError::Authorization(_) => ErrorCode::Forbidden,
            _ => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SidisiplinError;

    #[test]
    fn test_error_code_for_error() {
        assert_eq!(
            ErrorCode::for_error(&SidisiplinError::validation("x")),
            ErrorCode::ValidationFailed
        );
        assert_eq!(
            ErrorCode::for_error(&SidisiplinError::gone("x")),
            ErrorCode::Gone
        );
        assert_eq!(
            ErrorCode::for_error(&SidisiplinError::database_operation("x")),
            ErrorCode::InternalServerError
        );
        assert_eq!(ErrorCode::CaseAlreadyCompleted as i32, 7001);
    }
}
