//! 查询参数反序列化辅助
//!
//! `#[serde(flatten)]` 会把查询串中的值统一缓存为字符串，
//! 布尔与整数过滤条件需要从字符串解析。

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrString {
    Bool(bool),
    Str(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Str(String),
}

pub fn deserialize_optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::Str(s)) => match s.trim() {
            "" => Ok(None),
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "nilai boolean tidak valid: '{other}'"
            ))),
        },
    }
}

pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntOrString::Int(i)) => Ok(Some(i)),
        Some(IntOrString::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(IntOrString::Str(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("angka tidak valid: '{s}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Filters {
        #[serde(default, deserialize_with = "deserialize_optional_bool")]
        active: Option<bool>,
        #[serde(default, deserialize_with = "deserialize_optional_i64")]
        id: Option<i64>,
    }

    #[test]
    fn test_string_values() {
        let f: Filters = serde_json::from_str(r#"{"active":"false","id":"42"}"#).unwrap();
        assert_eq!(f.active, Some(false));
        assert_eq!(f.id, Some(42));
    }

    #[test]
    fn test_native_and_missing_values() {
        let f: Filters = serde_json::from_str(r#"{"active":true}"#).unwrap();
        assert_eq!(f.active, Some(true));
        assert_eq!(f.id, None);
    }

    #[test]
    fn test_invalid_value_rejected() {
        assert!(serde_json::from_str::<Filters>(r#"{"active":"maybe"}"#).is_err());
    }
}
