//! 动态配置缓存
//!
//! 启动时从 `configs` 表加载，管理员修改配置后热更新。
//! 读取方在缓存缺失时回退到默认值或静态配置。

use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::models::system::entities::KnownSettingKey;
use crate::utils::pdf::SchoolHeader;

static DYNAMIC_CONFIG: OnceLock<RwLock<DynamicConfigCache>> = OnceLock::new();

const DEFAULT_TOP_STUDENTS_LIMIT: u64 = 10;
const MAX_TOP_STUDENTS_LIMIT: u64 = 100;

#[derive(Debug, Default)]
struct DynamicConfigCache {
    settings: HashMap<String, String>,
    initialized: bool,
}

/// 动态配置访问接口
pub struct DynamicConfig;

impl DynamicConfig {
    /// 用数据库中的配置项整体替换缓存
    pub async fn init(settings: Vec<(String, String)>) {
        let cache = DYNAMIC_CONFIG.get_or_init(|| RwLock::new(DynamicConfigCache::default()));

        let mut guard = cache.write().await;
        guard.settings.clear();
        for (key, value) in settings {
            guard.settings.insert(key, value);
        }
        guard.initialized = true;

        tracing::info!(
            "动态配置缓存初始化完成，加载了 {} 个配置项",
            guard.settings.len()
        );
    }

    pub async fn update(key: &str, value: &str) {
        if let Some(cache) = DYNAMIC_CONFIG.get() {
            let mut guard = cache.write().await;
            guard.settings.insert(key.to_string(), value.to_string());
            tracing::debug!("动态配置更新: {} = {}", key, value);
        }
    }

    async fn get_string(key: KnownSettingKey) -> Option<String> {
        let cache = DYNAMIC_CONFIG.get()?;
        let guard = cache.read().await;
        guard
            .settings
            .get(key.as_str())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    async fn get_i64(key: KnownSettingKey) -> Option<i64> {
        Self::get_string(key).await.and_then(|v| v.parse().ok())
    }

    /// 学校名称，未配置时使用系统名称
    pub async fn school_name() -> String {
        Self::get_string(KnownSettingKey::SchoolName)
            .await
            .unwrap_or_else(|| AppConfig::get().app.system_name.clone())
    }

    pub async fn school_address() -> Option<String> {
        Self::get_string(KnownSettingKey::SchoolAddress).await
    }

    pub async fn headmaster_name() -> Option<String> {
        Self::get_string(KnownSettingKey::HeadmasterName).await
    }

    pub async fn headmaster_nip() -> Option<String> {
        Self::get_string(KnownSettingKey::HeadmasterNip).await
    }

    /// 学年，未配置时按当前日期推算（7 月开始新学年）
    pub async fn academic_year() -> String {
        match Self::get_string(KnownSettingKey::AcademicYear).await {
            Some(year) => year,
            None => {
                let today = chrono::Utc::now()
                    .with_timezone(&AppConfig::get().school_offset())
                    .date_naive();
                default_academic_year(today)
            }
        }
    }

    /// 报表中列出的学生数量上限
    pub async fn top_students_limit() -> u64 {
        Self::get_i64(KnownSettingKey::TopStudentsLimit)
            .await
            .filter(|v| *v > 0)
            .map(|v| (v as u64).min(MAX_TOP_STUDENTS_LIMIT))
            .unwrap_or(DEFAULT_TOP_STUDENTS_LIMIT)
    }

    /// PDF 抬头与落款
    pub async fn school_header() -> SchoolHeader {
        SchoolHeader {
            school_name: Self::school_name().await,
            school_address: Self::school_address().await,
            academic_year: Self::academic_year().await,
            headmaster_name: Self::headmaster_name().await,
            headmaster_nip: Self::headmaster_nip().await,
        }
    }

    pub async fn is_initialized() -> bool {
        if let Some(cache) = DYNAMIC_CONFIG.get() {
            return cache.read().await.initialized;
        }
        false
    }
}

fn default_academic_year(today: chrono::NaiveDate) -> String {
    use chrono::Datelike;

    let start = if today.month() >= 7 {
        today.year()
    } else {
        today.year() - 1
    };
    format!("{}/{}", start, start + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_default_academic_year() {
        let july = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
        assert_eq!(default_academic_year(july), "2025/2026");
        let march = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(default_academic_year(march), "2025/2026");
    }

    #[tokio::test]
    async fn test_init_and_update() {
        DynamicConfig::init(vec![
            ("school.name".to_string(), "SMA Negeri 3".to_string()),
            ("report.top_students_limit".to_string(), "5".to_string()),
            ("school.address".to_string(), "  ".to_string()),
        ])
        .await;

        assert!(DynamicConfig::is_initialized().await);
        assert_eq!(DynamicConfig::school_name().await, "SMA Negeri 3");
        assert_eq!(DynamicConfig::top_students_limit().await, 5);
        assert_eq!(DynamicConfig::school_address().await, None);

        DynamicConfig::update("report.top_students_limit", "0").await;
        assert_eq!(
            DynamicConfig::top_students_limit().await,
            DEFAULT_TOP_STUDENTS_LIMIT
        );
        DynamicConfig::update("report.top_students_limit", "5").await;
    }
}
