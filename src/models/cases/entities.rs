use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::students::entities::Gender;
use crate::models::violations::entities::ViolationLevel;

// 案件状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub enum CaseStatus {
    Pending,    // 待处理
    Proses,     // 处理中
    Selesai,    // 已完结
    Dibatalkan, // 已撤销
}

impl CaseStatus {
    pub const ALL: [CaseStatus; 4] = [
        CaseStatus::Pending,
        CaseStatus::Proses,
        CaseStatus::Selesai,
        CaseStatus::Dibatalkan,
    ];

    /// 新增（或修改完成标记的）处理记录之后案件应处的状态
    ///
    /// 只看这一条记录的完成标记，不参考其它记录。
    pub fn after_action(completed: bool) -> Self {
        if completed {
            CaseStatus::Selesai
        } else {
            CaseStatus::Proses
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Pending => "PENDING",
            CaseStatus::Proses => "PROSES",
            CaseStatus::Selesai => "SELESAI",
            CaseStatus::Dibatalkan => "DIBATALKAN",
        }
    }
}

impl<'de> Deserialize<'de> for CaseStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<CaseStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的案件状态: '{s}'. 支持的状态: PENDING, PROSES, SELESAI, DIBATALKAN"
            ))
        })
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(CaseStatus::Pending),
            "PROSES" => Ok(CaseStatus::Proses),
            "SELESAI" => Ok(CaseStatus::Selesai),
            "DIBATALKAN" => Ok(CaseStatus::Dibatalkan),
            _ => Err(format!("Invalid case status: {s}")),
        }
    }
}

// 违规案件
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct ViolationCase {
    pub id: i64,
    pub case_number: String,
    pub student_id: i64,
    pub violation_id: i64,
    pub reported_by: Option<i64>,
    pub incident_date: chrono::DateTime<chrono::Utc>,
    pub description: Option<String>,
    pub evidence_urls: Vec<String>,
    pub status: CaseStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct CaseStudent {
    pub id: i64,
    pub nis: String,
    pub name: String,
    pub gender: Gender,
    pub class_name: String,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct CaseViolation {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub points: i32,
    pub category_id: i64,
    pub category_code: String,
    pub category_name: String,
    pub category_level: ViolationLevel,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct CaseReporter {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
}

// 案件及其关联的学生、违规条目与报告人
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct CaseDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub case: ViolationCase,
    pub student: Option<CaseStudent>,
    pub violation: Option<CaseViolation>,
    pub reporter: Option<CaseReporter>,
}

/// 已有完成记录时拒绝新增或再次标记完成
pub const CASE_COMPLETED_MESSAGE: &str =
    "Kasus sudah selesai, tidak dapat menambah atau menyelesaikan tindakan lain";

// 案件处理记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct CaseAction {
    pub id: i64,
    pub case_id: i64,
    pub sanction_type_id: i64,
    pub sanction_type_name: Option<String>,
    pub description: Option<String>,
    pub action_date: chrono::DateTime<chrono::Utc>,
    pub is_completed: bool,
    pub follow_up_date: Option<chrono::DateTime<chrono::Utc>>,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub deleted_by_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl CaseAction {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_after_action_depends_only_on_flag() {
        assert_eq!(CaseStatus::after_action(true), CaseStatus::Selesai);
        assert_eq!(CaseStatus::after_action(false), CaseStatus::Proses);
    }

    #[test]
    fn test_status_strings() {
        for status in CaseStatus::ALL {
            assert_eq!(status.as_str().parse::<CaseStatus>().unwrap(), status);
        }
        let json = serde_json::to_string(&CaseStatus::Dibatalkan).unwrap();
        assert_eq!(json, "\"DIBATALKAN\"");
    }
}
