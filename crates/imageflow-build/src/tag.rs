//! イメージ参照とタグ
//!
//! バージョン文字列をそのまま Docker タグとして使うため、
//! ビルド前にタグとして妥当かを検証します。

use crate::error::{BuildError, BuildResult};

/// 浮動タグ名
pub const LATEST_TAG: &str = "latest";

/// タグのバリデーション
///
/// Docker タグの制約:
/// - 128文字以下
/// - 英数字、ピリオド、ハイフン、アンダースコアのみ
/// - 先頭はピリオドまたはハイフンではない
pub fn validate_tag(tag: &str) -> BuildResult<()> {
    if tag.is_empty() {
        return Err(BuildError::InvalidTag {
            tag: "(empty)".to_string(),
        });
    }

    if tag.len() > 128 {
        return Err(BuildError::InvalidTag {
            tag: format!("Tag too long ({} characters, max 128)", tag.len()),
        });
    }

    if tag.starts_with('.') || tag.starts_with('-') {
        return Err(BuildError::InvalidTag {
            tag: tag.to_string(),
        });
    }

    if let Some(c) = tag
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '.' && *c != '-' && *c != '_')
    {
        return Err(BuildError::InvalidTag {
            tag: format!("Invalid character '{}' in tag: {}", c, tag),
        });
    }

    Ok(())
}

/// `{image}:{tag}` 形式の参照を組み立てる
pub fn image_reference(image: &str, tag: &str) -> BuildResult<String> {
    validate_tag(tag)?;
    Ok(format!("{}:{}", image, tag))
}

/// イメージ名とタグを分離
///
/// # Examples
/// - `ghcr.io/org/app:v1.0` -> `("ghcr.io/org/app", Some("v1.0"))`
/// - `ghcr.io/org/app` -> `("ghcr.io/org/app", None)`
/// - `localhost:5000/app:dev` -> `("localhost:5000/app", Some("dev"))`
pub fn split_image_tag(image: &str) -> (&str, Option<&str>) {
    if let Some(pos) = image.rfind(':') {
        let potential_tag = &image[pos + 1..];

        // ポート番号（localhost:5000/app）はタグではない
        if !potential_tag.contains('/') {
            return (&image[..pos], Some(potential_tag));
        }
    }

    (image, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tag_accepts_versions() {
        assert!(validate_tag("1.0.0").is_ok());
        assert!(validate_tag("2.0.0-rc1").is_ok());
        assert!(validate_tag("3.8_slim").is_ok());
        assert!(validate_tag(LATEST_TAG).is_ok());
    }

    #[test]
    fn test_validate_tag_rejects_invalid() {
        assert!(validate_tag("").is_err());
        assert!(validate_tag("-rc1").is_err());
        assert!(validate_tag(".hidden").is_err());
        // SemVer のビルドメタデータはタグに使えない
        assert!(validate_tag("1.0.0+build.5").is_err());
        assert!(validate_tag(&"1".repeat(129)).is_err());
    }

    #[test]
    fn test_image_reference() {
        assert_eq!(
            image_reference("renovate/yarn", "1.22.0").unwrap(),
            "renovate/yarn:1.22.0"
        );
        assert!(matches!(
            image_reference("renovate/yarn", "1.0 beta"),
            Err(BuildError::InvalidTag { .. })
        ));
    }

    #[test]
    fn test_split_image_tag() {
        assert_eq!(
            split_image_tag("ghcr.io/org/app:v1.0"),
            ("ghcr.io/org/app", Some("v1.0"))
        );
        assert_eq!(split_image_tag("ghcr.io/org/app"), ("ghcr.io/org/app", None));
        assert_eq!(
            split_image_tag("localhost:5000/app"),
            ("localhost:5000/app", None)
        );
        assert_eq!(
            split_image_tag("localhost:5000/app:dev"),
            ("localhost:5000/app", Some("dev"))
        );
    }
}
