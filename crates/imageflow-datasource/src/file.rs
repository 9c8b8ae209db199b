//! ローカル JSON ファイル
//!
//! `{"releases": [{"version": "1.0.0"}], "latestVersion": "1.0.0"}` 形式。
//! オフラインでの動作確認や、独自に生成したリリース一覧に使います。

use crate::error::{DatasourceError, Result};
use imageflow_core::ReleaseSet;
use std::path::Path;

pub(crate) async fn fetch(path: &Path) -> Result<ReleaseSet> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|source| DatasourceError::Read {
            path: path.display().to_string(),
            source,
        })?;

    serde_json::from_slice(&content).map_err(|source| DatasourceError::Decode {
        url: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_reads_release_set() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"releases": [{{"version": "1.0.0"}}, {{"version": "1.1.0"}}], "latestVersion": "1.1.0"}}"#
        )
        .unwrap();

        let set = fetch(file.path()).await.unwrap();
        assert_eq!(set.versions().collect::<Vec<_>>(), vec!["1.0.0", "1.1.0"]);
        assert_eq!(set.latest_version.as_deref(), Some("1.1.0"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = fetch(Path::new("/nonexistent/releases.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, DatasourceError::Read { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = fetch(file.path()).await.unwrap_err();
        assert!(matches!(err, DatasourceError::Decode { .. }));
    }
}
