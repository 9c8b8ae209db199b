//! npm registry

use crate::error::Result;
use crate::http::JsonClient;
use imageflow_core::ReleaseSet;
use serde::Deserialize;
use serde::de::IgnoredAny;
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

#[derive(Debug, Deserialize)]
struct Packument {
    #[serde(default, rename = "dist-tags")]
    dist_tags: HashMap<String, String>,
    #[serde(default)]
    versions: BTreeMap<String, IgnoredAny>,
}

/// `@scope/name` は `@scope%2Fname` としてリクエストする
pub fn package_url(registry: &str, name: &str) -> String {
    let encoded = if name.starts_with('@') {
        name.replacen('/', "%2F", 1)
    } else {
        name.to_string()
    };
    format!("{}/{}", registry.trim_end_matches('/'), encoded)
}

impl Packument {
    /// `versions` のキーがリリース、`dist-tags.latest` が最新版のヒント
    fn into_release_set(mut self) -> ReleaseSet {
        let latest = self.dist_tags.remove("latest");
        let mut set = ReleaseSet::from_versions(self.versions.into_keys());
        set.latest_version = latest;
        set
    }
}

pub fn parse_packument(body: &[u8]) -> serde_json::Result<ReleaseSet> {
    let packument: Packument = serde_json::from_slice(body)?;
    Ok(packument.into_release_set())
}

pub(crate) async fn fetch(client: &JsonClient, registry: &str, name: &str) -> Result<ReleaseSet> {
    let url = package_url(registry, name);
    let page = client
        .get::<Packument>(&url, "application/json", None)
        .await?;
    Ok(page.body.into_release_set())
}
