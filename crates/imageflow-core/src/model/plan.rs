//! ビルド計画と実行結果

use serde::{Deserialize, Serialize};

/// Resolver が算出するビルド計画
///
/// `versions` はバージョンスキームの昇順。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPlan {
    pub versions: Vec<String>,
    /// `latest` タグを付け替える対象（安定版が無ければ None）
    pub latest_stable_version: Option<String>,
}

impl BuildPlan {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// `version` が `latest` を付け替える対象か
    pub fn is_latest_stable(&self, version: &str) -> bool {
        self.latest_stable_version.as_deref() == Some(version)
    }
}

/// 1バージョン分のビルド結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOutcome {
    pub version: String,
    pub succeeded: bool,
}

/// Executor の集計結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub outcomes: Vec<BuildOutcome>,
}

impl ExecutionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, version: impl Into<String>, succeeded: bool) {
        self.outcomes.push(BuildOutcome {
            version: version.into(),
            succeeded,
        });
    }

    pub fn built(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.succeeded)
            .map(|o| o.version.as_str())
            .collect()
    }

    pub fn failed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.succeeded)
            .map(|o| o.version.as_str())
            .collect()
    }

    /// 失敗が1件も無ければ true（ビルド0件も成功扱い）
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.succeeded)
    }
}
