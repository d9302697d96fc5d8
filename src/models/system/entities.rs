use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 配置值类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub enum SettingValueType {
    String,
    Integer,
}

impl<'de> Deserialize<'de> for SettingValueType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<SettingValueType>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的配置值类型: '{s}'. 支持的类型: string, integer"
            ))
        })
    }
}

impl std::fmt::Display for SettingValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingValueType::String => write!(f, "string"),
            SettingValueType::Integer => write!(f, "integer"),
        }
    }
}

impl std::str::FromStr for SettingValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(SettingValueType::String),
            "integer" => Ok(SettingValueType::Integer),
            _ => Err(format!("Invalid setting value type: {s}")),
        }
    }
}

impl SettingValueType {
    /// 校验字符串值是否符合该类型
    pub fn validate(&self, value: &str) -> Result<(), String> {
        match self {
            SettingValueType::String => {
                if value.trim().is_empty() {
                    Err("Nilai tidak boleh kosong".to_string())
                } else {
                    Ok(())
                }
            }
            SettingValueType::Integer => value
                .trim()
                .parse::<i64>()
                .map(|_| ())
                .map_err(|_| format!("Nilai '{value}' bukan bilangan bulat")),
        }
    }
}

/// 已知配置键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownSettingKey {
    SchoolName,
    SchoolAddress,
    HeadmasterName,
    HeadmasterNip,
    AcademicYear,
    TopStudentsLimit,
}

impl KnownSettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownSettingKey::SchoolName => "school.name",
            KnownSettingKey::SchoolAddress => "school.address",
            KnownSettingKey::HeadmasterName => "school.headmaster_name",
            KnownSettingKey::HeadmasterNip => "school.headmaster_nip",
            KnownSettingKey::AcademicYear => "school.academic_year",
            KnownSettingKey::TopStudentsLimit => "report.top_students_limit",
        }
    }

    pub fn value_type(&self) -> SettingValueType {
        match self {
            KnownSettingKey::TopStudentsLimit => SettingValueType::Integer,
            _ => SettingValueType::String,
        }
    }

    pub fn all() -> [Self; 6] {
        [
            KnownSettingKey::SchoolName,
            KnownSettingKey::SchoolAddress,
            KnownSettingKey::HeadmasterName,
            KnownSettingKey::HeadmasterNip,
            KnownSettingKey::AcademicYear,
            KnownSettingKey::TopStudentsLimit,
        ]
    }
}

impl std::str::FromStr for KnownSettingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnownSettingKey::all()
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown setting key: {s}"))
    }
}

/// 系统配置项
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SystemSetting {
    pub key: String,
    pub value: String,
    pub value_type: SettingValueType,
    pub description: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub updated_by: Option<i64>,
}

/// 审计动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Deactivate,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::Deactivate => "DEACTIVATE",
        }
    }
}

/// 审计日志
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct AuditLog {
    pub id: i64,
    pub user_id: Option<i64>,
    pub action: String,
    pub entity: String,
    pub entity_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_parse() {
        for key in KnownSettingKey::all() {
            assert_eq!(key.as_str().parse::<KnownSettingKey>().unwrap(), key);
        }
        assert!("app.unknown".parse::<KnownSettingKey>().is_err());
    }

    #[test]
    fn test_value_type_validate() {
        assert!(SettingValueType::Integer.validate("10").is_ok());
        assert!(SettingValueType::Integer.validate("sepuluh").is_err());
        assert!(SettingValueType::String.validate("  ").is_err());
    }
}
