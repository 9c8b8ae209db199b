//! バージョンスキーム
//!
//! 名前からスキーム実装を取得します。
//!
//! | 名前 | 実装 |
//! |------|------|
//! | `semver`, `npm` | [`SemverScheme`] |
//! | `loose` | [`LooseScheme`] |

mod loose;
mod semver;

pub use self::loose::LooseScheme;
pub use self::semver::SemverScheme;

use crate::error::{CoreError, Result};
use crate::provider::VersionScheme;

/// デフォルトのスキーム名
pub const DEFAULT_SCHEME: &str = "semver";

/// スキーム名から実装を取得
pub fn get(name: &str) -> Result<Box<dyn VersionScheme>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "" | "semver" | "npm" => Ok(Box::new(SemverScheme)),
        "loose" => Ok(Box::new(LooseScheme)),
        other => Err(CoreError::UnknownScheme(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_known_schemes() {
        assert_eq!(get("semver").unwrap().name(), "semver");
        assert_eq!(get("npm").unwrap().name(), "semver");
        assert_eq!(get("Loose").unwrap().name(), "loose");
        assert_eq!(get("").unwrap().name(), DEFAULT_SCHEME);
    }

    #[test]
    fn test_get_unknown_scheme() {
        let err = get("pep440").err().unwrap();
        assert!(matches!(err, CoreError::UnknownScheme(name) if name == "pep440"));
    }
}
