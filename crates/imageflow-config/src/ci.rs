//! CI 環境の検出
//!
//! CircleCI のプライマリ以外のブランチでは、最新版だけを強制的に
//! ビルドし、プッシュは行いません。

use crate::builder::BuilderConfig;

/// CI 環境の情報
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiEnv {
    pub circleci: bool,
    pub branch: Option<String>,
}

impl CiEnv {
    pub fn from_env() -> Self {
        Self {
            circleci: std::env::var("CIRCLECI").is_ok_and(|v| v == "true"),
            branch: std::env::var("CIRCLE_BRANCH").ok(),
        }
    }
}

/// CI のブランチビルドなら `build_only` / `last_only` / `force` を強制する
///
/// 上書きした場合は true を返す。
pub fn apply_ci_override(config: &mut BuilderConfig, env: &CiEnv) -> bool {
    if !env.circleci || env.branch.as_deref() == Some(config.primary_branch.as_str()) {
        return false;
    }

    tracing::info!(
        "CI branch build detected ({}), forcing latest build without push",
        env.branch.as_deref().unwrap_or("unknown")
    );
    config.build_only = true;
    config.last_only = true;
    config.force = true;
    true
}
