use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::sanction_types::entities::SanctionType;

// 违规等级
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export, export_to = "../frontend/src/types/generated/violation.ts")]
pub enum ViolationLevel {
    Ringan, // 轻
    Sedang, // 中
    Berat,  // 重
}

impl<'de> Deserialize<'de> for ViolationLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<ViolationLevel>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的违规等级: '{s}'. 支持的等级: RINGAN, SEDANG, BERAT"
            ))
        })
    }
}

impl std::fmt::Display for ViolationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationLevel::Ringan => write!(f, "RINGAN"),
            ViolationLevel::Sedang => write!(f, "SEDANG"),
            ViolationLevel::Berat => write!(f, "BERAT"),
        }
    }
}

impl std::str::FromStr for ViolationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RINGAN" => Ok(ViolationLevel::Ringan),
            "SEDANG" => Ok(ViolationLevel::Sedang),
            "BERAT" => Ok(ViolationLevel::Berat),
            _ => Err(format!("Invalid violation level: {s}")),
        }
    }
}

// 违规类别（如 PASAL_1）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/violation.ts")]
pub struct ViolationCategory {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub level: ViolationLevel,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 违规条目（如 1.A）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/violation.ts")]
pub struct Violation {
    pub id: i64,
    pub category_id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub points: i32,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 违规条目详情：附带类别与可用处分类型
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/violation.ts")]
pub struct ViolationDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub violation: Violation,
    pub category: Option<ViolationCategory>,
    pub sanction_types: Vec<SanctionType>,
}

// 旧版扁平违规类型目录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/violation.ts")]
pub struct ViolationType {
    pub id: i64,
    pub name: String,
    pub points: i32,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_roundtrip_strings() {
        for level in [
            ViolationLevel::Ringan,
            ViolationLevel::Sedang,
            ViolationLevel::Berat,
        ] {
            assert_eq!(level.to_string().parse::<ViolationLevel>().unwrap(), level);
        }
        assert!("ringan".parse::<ViolationLevel>().is_err());
    }
}
