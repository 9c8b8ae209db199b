//! semver スキーム
//!
//! 先頭の `v` を許容する厳密な SemVer 2.0。

use crate::provider::VersionScheme;
use semver::{BuildMetadata, Comparator, Op, Version, VersionReq};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default)]
pub struct SemverScheme;

impl SemverScheme {
    fn parse(version: &str) -> Option<Version> {
        let trimmed = version.trim();
        Version::parse(trimmed.strip_prefix('v').unwrap_or(trimmed)).ok()
    }

    /// comparator が許容する最小バージョン（と、その値自体を含むか）
    fn comparator_floor(comparator: &Comparator) -> Option<(Version, bool)> {
        let floor = Version {
            major: comparator.major,
            minor: comparator.minor.unwrap_or(0),
            patch: comparator.patch.unwrap_or(0),
            pre: comparator.pre.clone(),
            build: BuildMetadata::EMPTY,
        };

        match comparator.op {
            Op::Exact | Op::GreaterEq | Op::Tilde | Op::Caret | Op::Wildcard => Some((floor, true)),
            Op::Greater => match (comparator.minor, comparator.patch) {
                (Some(_), Some(_)) => Some((floor, false)),
                (Some(minor), None) => Some((Version::new(comparator.major, minor + 1, 0), true)),
                (None, _) => Some((Version::new(comparator.major + 1, 0, 0), true)),
            },
            // < / <= は下限を持たない
            _ => None,
        }
    }
}

impl VersionScheme for SemverScheme {
    fn name(&self) -> &str {
        "semver"
    }

    fn is_version(&self, version: &str) -> bool {
        Self::parse(version).is_some()
    }

    fn is_stable(&self, version: &str) -> bool {
        Self::parse(version).is_some_and(|v| v.pre.is_empty())
    }

    fn is_less_than_range(&self, version: &str, range: &str) -> bool {
        let Some(version) = Self::parse(version) else {
            return false;
        };

        // 単一バージョン指定は "=X.Y.Z" として扱う
        if let Some(bound) = Self::parse(range) {
            return version < bound;
        }

        match VersionReq::parse(range.trim()) {
            Ok(req) => req
                .comparators
                .iter()
                .filter_map(Self::comparator_floor)
                .any(|(floor, inclusive)| {
                    if inclusive {
                        version < floor
                    } else {
                        version <= floor
                    }
                }),
            Err(e) => {
                tracing::warn!("Invalid semver range '{}': {}", range, e);
                false
            }
        }
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        match (Self::parse(a), Self::parse(b)) {
            (Some(a), Some(b)) => a.cmp(&b),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    }
}
