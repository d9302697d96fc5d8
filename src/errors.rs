//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称与 HTTP 状态码映射。

use actix_web::http::StatusCode;
use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - status_code() 方法 - 返回对应的 HTTP 状态码
/// - 便捷构造函数
macro_rules! define_sidisiplin_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SidisiplinError {
            $($variant(String),)*
        }

        impl SidisiplinError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SidisiplinError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SidisiplinError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SidisiplinError::$variant(msg) => msg,)*
                }
            }

            /// 获取对应的 HTTP 状态码
            pub fn status_code(&self) -> StatusCode {
                match self {
                    $(SidisiplinError::$variant(_) => StatusCode::$status,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SidisiplinError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SidisiplinError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_sidisiplin_errors! {
    CacheConnection("E001", "Cache Connection Error", INTERNAL_SERVER_ERROR),
    CachePluginNotFound("E002", "Cache Plugin Not Found", INTERNAL_SERVER_ERROR),
    DatabaseConfig("E003", "Database Configuration Error", INTERNAL_SERVER_ERROR),
    DatabaseConnection("E004", "Database Connection Error", INTERNAL_SERVER_ERROR),
    DatabaseOperation("E005", "Database Operation Error", INTERNAL_SERVER_ERROR),
    FileOperation("E006", "File Operation Error", INTERNAL_SERVER_ERROR),
    Validation("E007", "Validation Error", BAD_REQUEST),
    NotFound("E008", "Resource Not Found", NOT_FOUND),
    Serialization("E009", "Serialization Error", INTERNAL_SERVER_ERROR),
    Gone("E010", "Resource Deleted", GONE),
    DateParse("E011", "Date Parse Error", BAD_REQUEST),
    Authentication("E012", "Authentication Error", UNAUTHORIZED),
    Authorization("E013", "Authorization Error", FORBIDDEN),
    Document("E014", "Document Generation Error", INTERNAL_SERVER_ERROR),
}

impl SidisiplinError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为客户端错误（4xx）
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl fmt::Display for SidisiplinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SidisiplinError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SidisiplinError {
    fn from(err: sea_orm::DbErr) -> Self {
        // 并发写入越过事务内检查时，由唯一索引兜底
        if matches!(
            err.sql_err(),
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
        ) {
            return SidisiplinError::Validation(format!("Data duplikat: {err}"));
        }
        SidisiplinError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for SidisiplinError {
    fn from(err: std::io::Error) -> Self {
        SidisiplinError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SidisiplinError {
    fn from(err: serde_json::Error) -> Self {
        SidisiplinError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for SidisiplinError {
    fn from(err: chrono::ParseError) -> Self {
        SidisiplinError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SidisiplinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SidisiplinError::cache_connection("test").code(), "E001");
        assert_eq!(SidisiplinError::database_config("test").code(), "E003");
        assert_eq!(SidisiplinError::validation("test").code(), "E007");
        assert_eq!(SidisiplinError::gone("test").code(), "E010");
        assert_eq!(SidisiplinError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SidisiplinError::not_found("test").error_type(),
            "Resource Not Found"
        );
        assert_eq!(
            SidisiplinError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            SidisiplinError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SidisiplinError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(SidisiplinError::gone("x").status_code(), StatusCode::GONE);
        assert_eq!(
            SidisiplinError::authorization("x").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            SidisiplinError::database_operation("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(SidisiplinError::validation("x").is_client_error());
        assert!(!SidisiplinError::document("x").is_client_error());
    }

    #[test]
    fn test_format_simple() {
        let err = SidisiplinError::validation("NIS wajib diisi");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("NIS wajib diisi"));
    }
}
