//! Docker Hub tags

use crate::error::Result;
use crate::http::{JsonClient, MAX_PAGES};
use imageflow_core::ReleaseSet;
use serde::Deserialize;

pub const DEFAULT_API: &str = "https://hub.docker.com/v2";

#[derive(Debug, Deserialize)]
pub struct TagPage {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub results: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TagEntry {
    pub name: String,
}

/// 公式イメージ（`node` など）は `library/` 配下
pub fn repository_path(name: &str) -> String {
    if name.contains('/') {
        name.to_string()
    } else {
        format!("library/{}", name)
    }
}

pub fn tags_url(api: &str, name: &str) -> String {
    format!(
        "{}/repositories/{}/tags?page_size=100",
        api.trim_end_matches('/'),
        repository_path(name)
    )
}

pub(crate) async fn fetch(client: &JsonClient, api: &str, name: &str) -> Result<ReleaseSet> {
    let mut versions = Vec::new();
    let mut next = Some(tags_url(api, name));

    for _ in 0..MAX_PAGES {
        let Some(url) = next.take() else {
            break;
        };
        let page = client.get::<TagPage>(&url, "application/json", None).await?;
        versions.extend(page.body.results.into_iter().map(|t| t.name));
        next = page.body.next;
    }

    if next.is_some() {
        tracing::warn!(
            "Docker Hub results truncated after {} pages ({} tags)",
            MAX_PAGES,
            versions.len()
        );
    }

    Ok(ReleaseSet::from_versions(versions))
}
