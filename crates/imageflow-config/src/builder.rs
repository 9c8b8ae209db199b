//! ビルダー設定
//!
//! 優先順位（高い順）: コマンドライン引数 → 環境変数 → 設定ファイル → デフォルト値。
//! コマンドライン引数の反映は CLI 側で行います。

use crate::error::{ConfigError, Result};
use imageflow_core::versioning::DEFAULT_SCHEME;
use imageflow_core::{LookupQuery, VersionPolicy};
use imageflow_registry::TagCheckMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 真偽値として「偽」とみなす値（大文字小文字は無視）
const FALSEY: &[&str] = &["", "0", "false", "no", "off", "n", "f"];

/// 環境変数の値を真偽値として解釈（偽の値以外はすべて真）
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    !FALSEY.contains(&value.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub datasource: Option<String>,
    pub lookup_name: Option<String>,
    pub lookup_type: Option<String>,
    pub version_scheme: Option<String>,
    pub start_version: Option<String>,
    pub image: Option<String>,
    pub build_arg: Option<String>,
    pub ignored_versions: Vec<String>,
    pub build_only: bool,
    #[serde(alias = "latest_only")]
    pub last_only: bool,
    pub force: bool,
    pub force_unstable: bool,

    /// ビルドコンテキスト
    pub context: PathBuf,
    pub dockerfile: Option<PathBuf>,
    pub docker_bin: String,
    /// Docker Hub API のベース URL
    pub hub_api: Option<String>,
    pub tag_check: TagCheckMode,
    /// CI でプッシュを許可するブランチ
    pub primary_branch: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            datasource: None,
            lookup_name: None,
            lookup_type: None,
            version_scheme: None,
            start_version: None,
            image: None,
            build_arg: None,
            ignored_versions: Vec::new(),
            build_only: false,
            last_only: false,
            force: false,
            force_unstable: false,
            context: PathBuf::from("."),
            dockerfile: None,
            docker_bin: "docker".to_string(),
            hub_api: None,
            tag_check: TagCheckMode::default(),
            primary_branch: "master".to_string(),
        }
    }
}

impl BuilderConfig {
    /// YAML 設定ファイルを読み込む
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        // 空ファイルはデフォルト設定
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// プロセスの環境変数を上書き適用
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// `lookup` で取得した環境変数を上書き適用
    ///
    /// 空文字列の文字列値は未設定として扱う。真偽値は設定されていれば
    /// 偽の値でも上書きする。
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let flag = |key: &str| lookup(key).map(|v| is_truthy(&v));

        let strings = [
            ("DATASOURCE", &mut self.datasource),
            ("LOOKUP_NAME", &mut self.lookup_name),
            ("LOOKUP_TYPE", &mut self.lookup_type),
            ("VERSION_SCHEME", &mut self.version_scheme),
            ("START_VERSION", &mut self.start_version),
            ("IMAGE", &mut self.image),
            ("BUILD_ARG", &mut self.build_arg),
            ("HUB_API", &mut self.hub_api),
        ];
        for (key, field) in strings {
            if let Some(value) = string(key) {
                *field = Some(value);
            }
        }

        if let Some(value) = string("IGNORED_VERSIONS") {
            self.ignored_versions = split_list(&value);
        }

        if let Some(value) = flag("BUILD_ONLY") {
            self.build_only = value;
        }
        if let Some(value) = flag("LAST_ONLY").or_else(|| flag("LATEST_ONLY")) {
            self.last_only = value;
        }
        if let Some(value) = flag("FORCE") {
            self.force = value;
        }
        if let Some(value) = flag("FORCE_UNSTABLE") {
            self.force_unstable = value;
        }

        if let Some(value) = string("DOCKER_BIN") {
            self.docker_bin = value;
        }
        if let Some(value) = string("DOCKERFILE") {
            self.dockerfile = Some(PathBuf::from(value));
        }
        if let Some(value) = string("TAG_CHECK") {
            self.tag_check = value.parse().map_err(|message| ConfigError::Invalid {
                key: "TAG_CHECK",
                message,
            })?;
        }

        Ok(())
    }

    /// ビルド引数名（未指定ならイメージ名から `<NAME>_VERSION` を生成）
    ///
    /// `renovate/yarn` -> `YARN_VERSION`, `ghcr.io/org/my-tool` -> `MY_TOOL_VERSION`
    pub fn build_arg_name(&self) -> Option<String> {
        if let Some(arg) = &self.build_arg {
            return Some(arg.clone());
        }

        let image = self.image.as_deref()?;
        let basename = image.rsplit('/').next().unwrap_or(image);
        let name: String = basename
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        Some(format!("{}_VERSION", name))
    }

    /// 必須項目の確認
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("IMAGE", &self.image),
            ("DATASOURCE", &self.datasource),
            ("LOOKUP_NAME", &self.lookup_name),
        ];
        for (key, value) in required {
            if value.as_deref().is_none_or(str::is_empty) {
                return Err(ConfigError::Missing(key));
            }
        }
        Ok(())
    }

    /// リリース検索クエリ（`validate()` 済みであること）
    pub fn lookup_query(&self) -> LookupQuery {
        LookupQuery {
            datasource: self.datasource.clone().unwrap_or_default(),
            lookup_name: self.lookup_name.clone().unwrap_or_default(),
            lookup_type: self.lookup_type.clone(),
            version_scheme: self.version_scheme_name().to_string(),
        }
    }

    pub fn version_scheme_name(&self) -> &str {
        self.version_scheme
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SCHEME)
    }

    pub fn version_policy(&self) -> VersionPolicy {
        VersionPolicy {
            start_version: self.start_version.clone(),
            ignored_versions: self.ignored_versions.clone(),
            last_only: self.last_only,
            force: self.force,
            force_unstable: self.force_unstable,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}
