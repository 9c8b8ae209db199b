//! Upstream release lookups
//!
//! [`DatasourceLookup`] implements [`ReleaseLookup`] on top of the public
//! npm registry, GitHub and Docker Hub APIs, plus a local JSON file source.

pub mod docker_hub;
pub mod error;
pub mod file;
pub mod github;
pub mod http;
pub mod npm;

pub use error::DatasourceError;

use async_trait::async_trait;
use crate::http::JsonClient;
use imageflow_core::{CoreError, LookupQuery, ReleaseLookup, ReleaseSet};
use std::path::Path;

/// Supported release sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datasource {
    Npm,
    GithubReleases,
    GithubTags,
    DockerHub,
    File,
}

impl Datasource {
    /// Resolves a datasource name and optional lookup type.
    ///
    /// `github` alone means tags; `github` with lookup type `releases` means releases.
    pub fn parse(name: &str, lookup_type: Option<&str>) -> imageflow_core::Result<Self> {
        match name {
            "npm" => Ok(Self::Npm),
            "github-releases" => Ok(Self::GithubReleases),
            "github-tags" => Ok(Self::GithubTags),
            "github" if lookup_type == Some("releases") => Ok(Self::GithubReleases),
            "github" => Ok(Self::GithubTags),
            "docker" | "docker-hub" => Ok(Self::DockerHub),
            "file" => Ok(Self::File),
            other => Err(CoreError::UnknownDatasource(other.to_string())),
        }
    }
}

/// Base URLs of the remote APIs
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub npm_registry: String,
    pub github_api: String,
    pub docker_hub_api: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            npm_registry: npm::DEFAULT_REGISTRY.to_string(),
            github_api: github::DEFAULT_API.to_string(),
            docker_hub_api: docker_hub::DEFAULT_API.to_string(),
        }
    }
}

pub struct DatasourceLookup {
    client: JsonClient,
    endpoints: Endpoints,
    github_token: Option<String>,
}

impl Default for DatasourceLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasourceLookup {
    /// Default endpoints, GitHub token taken from `GITHUB_TOKEN` when set.
    pub fn new() -> Self {
        Self {
            client: JsonClient::new(reqwest::Client::new()),
            endpoints: Endpoints::default(),
            github_token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_github_token(mut self, token: Option<String>) -> Self {
        self.github_token = token;
        self
    }

    async fn fetch(&self, source: Datasource, name: &str) -> error::Result<ReleaseSet> {
        let token = self.github_token.as_deref();
        match source {
            Datasource::Npm => npm::fetch(&self.client, &self.endpoints.npm_registry, name).await,
            Datasource::GithubReleases => {
                github::fetch_releases(&self.client, &self.endpoints.github_api, name, token).await
            }
            Datasource::GithubTags => {
                github::fetch_tags(&self.client, &self.endpoints.github_api, name, token).await
            }
            Datasource::DockerHub => {
                docker_hub::fetch(&self.client, &self.endpoints.docker_hub_api, name).await
            }
            Datasource::File => file::fetch(Path::new(name)).await,
        }
    }
}

#[async_trait]
impl ReleaseLookup for DatasourceLookup {
    async fn get_releases(&self, query: &LookupQuery) -> imageflow_core::Result<ReleaseSet> {
        let source = Datasource::parse(&query.datasource, query.lookup_type.as_deref())?;
        tracing::debug!("Looking up {:?} releases for {}", source, query.lookup_name);

        let set = self
            .fetch(source, &query.lookup_name)
            .await
            .map_err(|e| CoreError::lookup_failed(&query.datasource, &query.lookup_name, e))?;

        tracing::debug!(
            "Found {} releases for {}",
            set.releases.len(),
            query.lookup_name
        );
        Ok(set)
    }
}
