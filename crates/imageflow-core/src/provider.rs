//! Collaborator trait definitions
//!
//! The resolver only talks to the outside world through these traits.

use crate::error::Result;
use crate::model::{LookupQuery, ReleaseSet};
use async_trait::async_trait;
use std::cmp::Ordering;

/// Upstream release enumeration (npm, GitHub, Docker Hub, ...)
#[async_trait]
pub trait ReleaseLookup: Send + Sync {
    /// Fetch every known release for the queried package.
    ///
    /// Failures are fatal to the run and must not be folded into an empty set.
    async fn get_releases(&self, query: &LookupQuery) -> Result<ReleaseSet>;
}

/// Registry tag lookup
#[async_trait]
pub trait TagExistence: Send + Sync {
    /// Returns whether `image:tag` is already published.
    async fn tag_exists(&self, image: &str, tag: &str) -> Result<bool>;
}

/// Version parsing, ordering and stability rules of one scheme
pub trait VersionScheme: Send + Sync {
    /// Scheme name (e.g., "semver", "loose")
    fn name(&self) -> &str;

    /// Whether `version` is a valid version under this scheme
    fn is_version(&self, version: &str) -> bool;

    /// Whether `version` is a stable (non pre-release) version
    fn is_stable(&self, version: &str) -> bool;

    /// Whether `version` sorts below every version matched by `range`
    fn is_less_than_range(&self, version: &str, range: &str) -> bool;

    /// Total order over valid versions. Invalid input sorts first.
    fn compare(&self, a: &str, b: &str) -> Ordering;
}
