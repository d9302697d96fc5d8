//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod audit_logs;
pub mod case_actions;
pub mod case_number_sequences;
pub mod configs;
pub mod reports;
pub mod sanction_types;
pub mod sanctions;
pub mod students;
pub mod users;
pub mod violation_cases;
pub mod violation_categories;
pub mod violation_sanction_types;
pub mod violation_types;
pub mod violations;

use chrono::{DateTime, Utc};

/// Unix 秒转 UTC 时间
pub(crate) fn ts_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
