//! リリース定義

use serde::{Deserialize, Serialize};

/// 上流パッケージの1リリース
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub version: String,
}

impl Release {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

/// データソースから取得したリリース一覧
///
/// 順序は保証されない。`latest_version` はデータソースが
/// 「最新版」を明示している場合のみ設定される（例: npm の dist-tags.latest）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSet {
    #[serde(default)]
    pub releases: Vec<Release>,
    #[serde(default)]
    pub latest_version: Option<String>,
}

impl ReleaseSet {
    pub fn from_versions<I, S>(versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            releases: versions.into_iter().map(Release::new).collect(),
            latest_version: None,
        }
    }

    pub fn with_latest(mut self, latest: impl Into<String>) -> Self {
        self.latest_version = Some(latest.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.releases.iter().map(|r| r.version.as_str())
    }
}

/// リリース検索のクエリ（キャッシュキーを兼ねる）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LookupQuery {
    /// データソース名（例: "npm", "github-releases", "docker"）
    pub datasource: String,
    /// パッケージ名（例: "yarn", "nodejs/node"）
    pub lookup_name: String,
    /// データソース固有の検索種別（例: github の "releases"）
    pub lookup_type: Option<String>,
    /// バージョンスキーム名
    pub version_scheme: String,
}
