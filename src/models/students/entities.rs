use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 性别：L（男）/ P（女）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub enum Gender {
    L,
    P,
}

impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Gender>().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::L => write!(f, "L"),
            Gender::P => write!(f, "P"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "L" => Ok(Gender::L),
            "P" => Ok(Gender::P),
            _ => Err(format!("Jenis kelamin tidak valid: '{s}'. Gunakan L atau P")),
        }
    }
}

// 学生实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub nis: String,
    pub nisn: Option<String>,
    pub name: String,
    pub gender: Gender,
    pub class_name: String,
    pub birth_date: Option<chrono::NaiveDate>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parse_lenient_case() {
        assert_eq!("l".parse::<Gender>().unwrap(), Gender::L);
        assert_eq!(" P ".parse::<Gender>().unwrap(), Gender::P);
        assert!("X".parse::<Gender>().is_err());
    }
}
