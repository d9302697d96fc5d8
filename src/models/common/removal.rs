use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 删除操作的结果：有依赖数据且未强制删除时仅停用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/common.ts")]
pub enum RemovalOutcome {
    Deleted,
    Deactivated { dependents: u64 },
}

impl RemovalOutcome {
    /// 面向用户的提示信息
    pub fn message(&self, entity_label: &str) -> String {
        match self {
            RemovalOutcome::Deleted => format!("{entity_label} berhasil dihapus"),
            RemovalOutcome::Deactivated { dependents } => format!(
                "{entity_label} memiliki {dependents} data terkait, sehingga dinonaktifkan. Gunakan force=true untuk menghapus permanen"
            ),
        }
    }
}

// 删除参数：`?force=true` 时级联删除
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/common.ts")]
pub struct ForceDeleteQuery {
    #[serde(default)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removal_message_names_dependents() {
        let msg = RemovalOutcome::Deactivated { dependents: 3 }.message("Siswa");
        assert!(msg.contains("3 data terkait"));
        assert_eq!(
            RemovalOutcome::Deleted.message("Siswa"),
            "Siswa berhasil dihapus"
        );
    }

    #[test]
    fn test_removal_serialization() {
        let json = serde_json::to_value(RemovalOutcome::Deactivated { dependents: 2 }).unwrap();
        assert_eq!(json["outcome"], "deactivated");
        assert_eq!(json["dependents"], 2);
    }
}
