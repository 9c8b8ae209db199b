//! タグの存在確認
//!
//! Docker Hub は Hub API、それ以外のレジストリは Registry v2 API の
//! マニフェスト HEAD で確認します。

use crate::auth::{Credentials, DockerConfigAuth};
use crate::error::{RegistryError, Result};
use crate::reference::ImageRef;
use async_trait::async_trait;
use imageflow_core::{CoreError, TagExistence};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, USER_AGENT, WWW_AUTHENTICATE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tokio::sync::Mutex;

pub const DEFAULT_HUB_API: &str = "https://hub.docker.com/v2";

const USER_AGENT_VALUE: &str = concat!("imageflow/", env!("CARGO_PKG_VERSION"));

const MANIFEST_ACCEPT: &str = "application/vnd.oci.image.index.v1+json, \
     application/vnd.docker.distribution.manifest.list.v2+json, \
     application/vnd.oci.image.manifest.v1+json, \
     application/vnd.docker.distribution.manifest.v2+json";

/// 確認に失敗したとき（404 以外の応答や通信エラー）の扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagCheckMode {
    /// 「存在しない」とみなして再ビルドする
    #[default]
    Optimistic,
    /// エラーとして実行を止める
    Strict,
}

impl FromStr for TagCheckMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "optimistic" => Ok(Self::Optimistic),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "unknown tag check mode '{}' (expected optimistic or strict)",
                other
            )),
        }
    }
}

impl fmt::Display for TagCheckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optimistic => f.write_str("optimistic"),
            Self::Strict => f.write_str("strict"),
        }
    }
}

/// 2xx は存在、404 は不在、それ以外はエラー
pub fn classify_status(url: &str, status: StatusCode) -> Result<bool> {
    if status.is_success() {
        Ok(true)
    } else if status == StatusCode::NOT_FOUND {
        Ok(false)
    } else {
        Err(RegistryError::UnexpectedStatus {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

pub fn hub_tag_url(hub_api: &str, repository: &str, tag: &str) -> String {
    format!(
        "{}/repositories/{}/tags/{}",
        hub_api.trim_end_matches('/'),
        repository,
        tag
    )
}

pub fn manifest_url(image: &ImageRef, tag: &str) -> String {
    format!(
        "{}://{}/v2/{}/manifests/{}",
        image.scheme(),
        image.registry,
        image.repository,
        tag
    )
}

/// `WWW-Authenticate: Bearer ...` のチャレンジ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerChallenge {
    pub realm: String,
    pub service: Option<String>,
    pub scope: Option<String>,
}

impl BearerChallenge {
    pub fn parse(header: &str) -> Option<Self> {
        let (scheme, params) = header.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }

        let mut realm = None;
        let mut service = None;
        let mut scope = None;
        for (key, value) in auth_params(params) {
            match key.to_ascii_lowercase().as_str() {
                "realm" => realm = Some(value),
                "service" => service = Some(value),
                "scope" => scope = Some(value),
                _ => {}
            }
        }

        Some(Self {
            realm: realm?,
            service,
            scope,
        })
    }
}

/// `key="value", key=value` を分解（引用符内のカンマは区切りではない）
fn auth_params(input: &str) -> Vec<(String, String)> {
    let mut params = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| *c == ',' || c.is_whitespace()) {
            chars.next();
        }

        let key: String = chars.by_ref().take_while(|c| *c != '=').collect();
        if key.is_empty() {
            break;
        }

        let mut value = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            for c in chars.by_ref() {
                if c == '"' {
                    break;
                }
                value.push(c);
            }
        } else {
            while let Some(c) = chars.peek().copied() {
                if c == ',' {
                    break;
                }
                value.push(c);
                chars.next();
            }
        }

        params.push((key.trim().to_string(), value.trim().to_string()));
    }

    params
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

/// [`TagExistence`] の HTTP 実装
///
/// 認証情報はレジストリごとに最初の確認時に1回だけ解決し、以降は使い回す。
pub struct RegistryTagChecker {
    client: reqwest::Client,
    hub_api: String,
    mode: TagCheckMode,
    auth: DockerConfigAuth,
    credentials: Mutex<HashMap<String, Option<Credentials>>>,
}

impl Default for RegistryTagChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryTagChecker {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            hub_api: DEFAULT_HUB_API.to_string(),
            mode: TagCheckMode::default(),
            auth: DockerConfigAuth::new(),
            credentials: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_hub_api(mut self, hub_api: impl Into<String>) -> Self {
        self.hub_api = hub_api.into();
        self
    }

    pub fn with_mode(mut self, mode: TagCheckMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_auth(mut self, auth: DockerConfigAuth) -> Self {
        self.auth = auth;
        self.credentials = Mutex::new(HashMap::new());
        self
    }

    async fn registry_credentials(&self, registry: &str) -> Result<Option<Credentials>> {
        let mut resolved = self.credentials.lock().await;
        if let Some(credentials) = resolved.get(registry) {
            return Ok(credentials.clone());
        }

        let credentials = self.auth.credentials(registry).await?;
        resolved.insert(registry.to_string(), credentials.clone());
        Ok(credentials)
    }

    /// 存在確認の本体。判定できない応答はエラーで返す
    pub async fn probe(&self, image: &str, tag: &str) -> Result<bool> {
        let image = ImageRef::parse(image)?;
        if image.is_docker_hub() {
            self.probe_hub(&image, tag).await
        } else {
            self.probe_registry(&image, tag).await
        }
    }

    async fn probe_hub(&self, image: &ImageRef, tag: &str) -> Result<bool> {
        let url = hub_tag_url(&self.hub_api, &image.repository, tag);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .send()
            .await?;
        classify_status(&url, response.status())
    }

    async fn probe_registry(&self, image: &ImageRef, tag: &str) -> Result<bool> {
        let url = manifest_url(image, tag);
        let credentials = self.registry_credentials(&image.registry).await?;
        tracing::debug!("HEAD {}", url);

        let response = self
            .head_manifest(&url, credentials.as_ref(), None)
            .await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return classify_status(&url, response.status());
        }

        let Some(challenge) = bearer_challenge(response.headers()) else {
            return classify_status(&url, response.status());
        };

        let token = self.fetch_token(&challenge, credentials.as_ref()).await?;
        let response = self
            .head_manifest(&url, None, Some(&token))
            .await?;
        classify_status(&url, response.status())
    }

    async fn head_manifest(
        &self,
        url: &str,
        credentials: Option<&Credentials>,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response> {
        let mut request = self
            .client
            .head(url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(ACCEPT, MANIFEST_ACCEPT);

        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        } else if let Some(creds) = credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        Ok(request.send().await?)
    }

    async fn fetch_token(
        &self,
        challenge: &BearerChallenge,
        credentials: Option<&Credentials>,
    ) -> Result<String> {
        tracing::debug!("Requesting registry token from {}", challenge.realm);

        let mut query = Vec::new();
        if let Some(service) = &challenge.service {
            query.push(("service", service.as_str()));
        }
        if let Some(scope) = &challenge.scope {
            query.push(("scope", scope.as_str()));
        }

        let mut request = self
            .client
            .get(&challenge.realm)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .query(&query);
        if let Some(creds) = credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(RegistryError::UnexpectedStatus {
                url: challenge.realm.clone(),
                status: response.status().as_u16(),
            });
        }

        let body: TokenResponse = response.json().await?;
        body.token
            .or(body.access_token)
            .ok_or_else(|| RegistryError::AuthFailed {
                registry: challenge.realm.clone(),
                message: "token endpoint returned no token".to_string(),
            })
    }
}

fn bearer_challenge(headers: &HeaderMap) -> Option<BearerChallenge> {
    let value = headers.get(WWW_AUTHENTICATE)?.to_str().ok()?;
    BearerChallenge::parse(value)
}

#[async_trait]
impl TagExistence for RegistryTagChecker {
    async fn tag_exists(&self, image: &str, tag: &str) -> imageflow_core::Result<bool> {
        match self.probe(image, tag).await {
            Ok(exists) => Ok(exists),
            Err(e) => match self.mode {
                TagCheckMode::Optimistic => {
                    tracing::warn!(
                        "Could not check {}:{} ({}), assuming it does not exist",
                        image,
                        tag,
                        e
                    );
                    Ok(false)
                }
                TagCheckMode::Strict => Err(CoreError::TagLookupFailed {
                    image: image.to_string(),
                    tag: tag.to_string(),
                    message: e.to_string(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert!(classify_status("u", StatusCode::OK).unwrap());
        assert!(!classify_status("u", StatusCode::NOT_FOUND).unwrap());
        assert!(matches!(
            classify_status("u", StatusCode::TOO_MANY_REQUESTS),
            Err(RegistryError::UnexpectedStatus { status: 429, .. })
        ));
        assert!(classify_status("u", StatusCode::INTERNAL_SERVER_ERROR).is_err());
    }

    #[test]
    fn test_hub_tag_url() {
        assert_eq!(
            hub_tag_url(DEFAULT_HUB_API, "renovate/yarn", "1.22.0"),
            "https://hub.docker.com/v2/repositories/renovate/yarn/tags/1.22.0"
        );
    }

    #[test]
    fn test_manifest_url() {
        let image = ImageRef::parse("ghcr.io/org/app").unwrap();
        assert_eq!(
            manifest_url(&image, "1.0.0"),
            "https://ghcr.io/v2/org/app/manifests/1.0.0"
        );

        let local = ImageRef::parse("localhost:5000/app").unwrap();
        assert_eq!(
            manifest_url(&local, "dev"),
            "http://localhost:5000/v2/app/manifests/dev"
        );
    }

    #[test]
    fn test_parse_bearer_challenge() {
        let header = r#"Bearer realm="https://ghcr.io/token",service="ghcr.io",scope="repository:org/app:pull""#;
        assert_eq!(
            BearerChallenge::parse(header),
            Some(BearerChallenge {
                realm: "https://ghcr.io/token".into(),
                service: Some("ghcr.io".into()),
                scope: Some("repository:org/app:pull".into()),
            })
        );
    }

    #[test]
    fn test_parse_bearer_challenge_with_comma_in_scope() {
        let header = r#"Bearer realm="https://auth.example.test/token", scope="repository:a/b:pull,push""#;
        let challenge = BearerChallenge::parse(header).unwrap();
        assert_eq!(challenge.scope.as_deref(), Some("repository:a/b:pull,push"));
        assert_eq!(challenge.service, None);
    }

    #[test]
    fn test_parse_non_bearer_challenge() {
        assert_eq!(BearerChallenge::parse(r#"Basic realm="registry""#), None);
        assert_eq!(BearerChallenge::parse(r#"Bearer service="x""#), None);
    }

    #[test]
    fn test_tag_check_mode_from_str() {
        assert_eq!("strict".parse::<TagCheckMode>(), Ok(TagCheckMode::Strict));
        assert_eq!(
            "Optimistic".parse::<TagCheckMode>(),
            Ok(TagCheckMode::Optimistic)
        );
        assert!("maybe".parse::<TagCheckMode>().is_err());
    }

    #[tokio::test]
    async fn test_credentials_resolved_once_per_registry() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"auths": {"ghcr.io": {"auth": "Ym90OnMzY3JldA=="}}}"#).unwrap();
        let checker = RegistryTagChecker::new().with_auth(DockerConfigAuth::with_config_path(path.clone()));

        let first = checker.registry_credentials("ghcr.io").await.unwrap();
        assert_eq!(first.as_ref().map(|c| c.username.as_str()), Some("bot"));
        assert_eq!(checker.registry_credentials("quay.io").await.unwrap(), None);

        // 2回目以降は config.json を読み直さない
        std::fs::remove_file(&path).unwrap();
        assert_eq!(checker.registry_credentials("ghcr.io").await.unwrap(), first);
    }

    fn unreachable_checker(mode: TagCheckMode) -> RegistryTagChecker {
        RegistryTagChecker::new()
            .with_hub_api("http://127.0.0.1:9/v2")
            .with_mode(mode)
    }

    #[tokio::test]
    async fn test_optimistic_mode_folds_errors_into_missing() {
        let checker = unreachable_checker(TagCheckMode::Optimistic);
        assert!(!checker.tag_exists("renovate/yarn", "1.0.0").await.unwrap());
    }

    #[tokio::test]
    async fn test_strict_mode_surfaces_errors() {
        let checker = unreachable_checker(TagCheckMode::Strict);
        let err = checker
            .tag_exists("renovate/yarn", "1.0.0")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::TagLookupFailed { .. }));
    }
}
