//! imageflow の設定管理
//!
//! 設定ファイル（YAML）と環境変数からビルダー設定を組み立てます。

pub mod builder;
pub mod ci;
pub mod error;

pub use builder::{BuilderConfig, is_truthy};
pub use ci::{CiEnv, apply_ci_override};
pub use error::*;

use std::path::PathBuf;

/// 設定ファイル名（優先順）
const CONFIG_FILE_NAMES: &[&str] = &["imageflow.local.yaml", "imageflow.yaml", ".imageflow.yaml"];

/// グローバル設定ディレクトリ（`~/.config/imageflow` など）
pub fn get_config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("imageflow"))
}

/// 設定ファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 IMAGEFLOW_CONFIG_PATH (直接パス指定)
/// 2. カレントディレクトリ: imageflow.local.yaml, imageflow.yaml, .imageflow.yaml
/// 3. ~/.config/imageflow/imageflow.yaml (グローバル設定)
///
/// 見つからない場合は `Ok(None)`（環境変数だけでも動作するため）。
pub fn find_config_file() -> Result<Option<PathBuf>> {
    if let Ok(config_path) = std::env::var("IMAGEFLOW_CONFIG_PATH") {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(Some(path));
        }
        tracing::warn!(
            "IMAGEFLOW_CONFIG_PATH points to a missing file: {}",
            path.display()
        );
    }

    let current_dir = std::env::current_dir()?;
    for filename in CONFIG_FILE_NAMES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    if let Ok(config_dir) = get_config_dir() {
        let global_config = config_dir.join("imageflow.yaml");
        if global_config.exists() {
            return Ok(Some(global_config));
        }
    }

    Ok(None)
}

/// 設定ファイル（あれば）と環境変数から設定を読み込む
pub fn load_config(explicit: Option<PathBuf>) -> Result<BuilderConfig> {
    let path = match explicit {
        Some(path) => Some(path),
        None => find_config_file()?,
    };

    let mut config = match &path {
        Some(path) => {
            tracing::debug!("Loading config file: {}", path.display());
            BuilderConfig::load(path)?
        }
        None => BuilderConfig::default(),
    };

    config.apply_env()?;
    Ok(config)
}
