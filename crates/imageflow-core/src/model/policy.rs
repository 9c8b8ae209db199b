//! バージョン選択ポリシー

use serde::{Deserialize, Serialize};

/// ビルド対象バージョンの選択ポリシー
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionPolicy {
    /// 下限バージョン（これ未満のバージョンは除外）
    #[serde(default)]
    pub start_version: Option<String>,
    /// 無条件に除外するバージョン（正規化後の完全一致）
    #[serde(default)]
    pub ignored_versions: Vec<String>,
    /// 最新の1バージョンのみを対象にする
    #[serde(default, alias = "latest_only")]
    pub last_only: bool,
    /// タグの存在確認をスキップして再ビルドする
    #[serde(default)]
    pub force: bool,
    /// force 時に不安定版も含める
    #[serde(default)]
    pub force_unstable: bool,
}

impl VersionPolicy {
    pub fn is_ignored(&self, version: &str) -> bool {
        self.ignored_versions.iter().any(|v| v == version)
    }
}
