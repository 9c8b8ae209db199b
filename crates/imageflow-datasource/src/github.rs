//! GitHub releases and tags

use crate::error::Result;
use crate::http::{JsonClient, MAX_PAGES, next_link};
use imageflow_core::ReleaseSet;
use serde::Deserialize;
use serde::de::DeserializeOwned;

pub const DEFAULT_API: &str = "https://api.github.com";

const ACCEPT_GITHUB: &str = "application/vnd.github+json";

#[derive(Debug, Deserialize)]
pub struct GithubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub draft: bool,
}

#[derive(Debug, Deserialize)]
pub struct GithubTag {
    pub name: String,
}

/// Release tags of one page, drafts skipped.
pub fn release_versions(releases: Vec<GithubRelease>) -> Vec<String> {
    releases
        .into_iter()
        .filter(|r| !r.draft)
        .map(|r| r.tag_name)
        .collect()
}

pub fn tag_versions(tags: Vec<GithubTag>) -> Vec<String> {
    tags.into_iter().map(|t| t.name).collect()
}

pub fn releases_url(api: &str, repo: &str) -> String {
    format!("{}/repos/{}/releases?per_page=100", api.trim_end_matches('/'), repo)
}

pub fn tags_url(api: &str, repo: &str) -> String {
    format!("{}/repos/{}/tags?per_page=100", api.trim_end_matches('/'), repo)
}

pub(crate) async fn fetch_releases(
    client: &JsonClient,
    api: &str,
    repo: &str,
    token: Option<&str>,
) -> Result<ReleaseSet> {
    let versions =
        fetch_paginated::<GithubRelease, _>(client, releases_url(api, repo), token, release_versions)
            .await?;
    Ok(ReleaseSet::from_versions(versions))
}

pub(crate) async fn fetch_tags(
    client: &JsonClient,
    api: &str,
    repo: &str,
    token: Option<&str>,
) -> Result<ReleaseSet> {
    let versions =
        fetch_paginated::<GithubTag, _>(client, tags_url(api, repo), token, tag_versions).await?;
    Ok(ReleaseSet::from_versions(versions))
}

async fn fetch_paginated<T, F>(
    client: &JsonClient,
    first: String,
    token: Option<&str>,
    extract: F,
) -> Result<Vec<String>>
where
    T: DeserializeOwned,
    F: Fn(Vec<T>) -> Vec<String>,
{
    let mut versions = Vec::new();
    let mut next = Some(first);

    for _ in 0..MAX_PAGES {
        let Some(url) = next.take() else {
            break;
        };
        let page = client.get::<Vec<T>>(&url, ACCEPT_GITHUB, token).await?;
        versions.extend(extract(page.body));
        next = next_link(&page.headers);
    }

    if next.is_some() {
        tracing::warn!(
            "GitHub results truncated after {} pages ({} versions)",
            MAX_PAGES,
            versions.len()
        );
    }

    Ok(versions)
}
