//! イメージ名の分解

use crate::error::{RegistryError, Result};

/// Docker Hub のレジストリ名
pub const DOCKER_HUB: &str = "docker.io";

/// レジストリとリポジトリに分解したイメージ名（タグは含まない）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub registry: String,
    pub repository: String,
}

impl ImageRef {
    /// イメージ名を分解
    ///
    /// # Examples
    /// - `renovate/yarn` -> (`docker.io`, `renovate/yarn`)
    /// - `node` -> (`docker.io`, `library/node`)
    /// - `ghcr.io/org/app` -> (`ghcr.io`, `org/app`)
    /// - `localhost:5000/app` -> (`localhost:5000`, `app`)
    pub fn parse(image: &str) -> Result<Self> {
        if image.is_empty() || image.starts_with('/') || image.ends_with('/') {
            return Err(RegistryError::InvalidImage(image.to_string()));
        }

        let (registry, repository) = match image.split_once('/') {
            Some((first, rest)) if is_registry_host(first) => (first, rest),
            _ => (DOCKER_HUB, image),
        };

        let registry = match registry {
            "index.docker.io" | "registry-1.docker.io" => DOCKER_HUB,
            other => other,
        };

        let repository = if registry == DOCKER_HUB && !repository.contains('/') {
            format!("library/{}", repository)
        } else {
            repository.to_string()
        };

        Ok(Self {
            registry: registry.to_string(),
            repository,
        })
    }

    pub fn is_docker_hub(&self) -> bool {
        self.registry == DOCKER_HUB
    }

    /// Registry API の URL スキーム（ローカルレジストリは http）
    pub fn scheme(&self) -> &'static str {
        let host = self
            .registry
            .split(':')
            .next()
            .unwrap_or(self.registry.as_str());
        if host == "localhost" || host == "127.0.0.1" {
            "http"
        } else {
            "https"
        }
    }
}

/// 先頭セグメントがレジストリホストか
///
/// `.` か `:` を含む、または `localhost` の場合のみレジストリとみなす。
fn is_registry_host(segment: &str) -> bool {
    segment.contains('.') || segment.contains(':') || segment == "localhost"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(image: &str) -> (String, String) {
        let r = ImageRef::parse(image).unwrap();
        (r.registry, r.repository)
    }

    #[test]
    fn test_docker_hub_images() {
        assert_eq!(
            parse("renovate/yarn"),
            ("docker.io".into(), "renovate/yarn".into())
        );
        assert_eq!(parse("node"), ("docker.io".into(), "library/node".into()));
        assert_eq!(
            parse("docker.io/renovate/yarn"),
            ("docker.io".into(), "renovate/yarn".into())
        );
        assert_eq!(
            parse("index.docker.io/node"),
            ("docker.io".into(), "library/node".into())
        );
    }

    #[test]
    fn test_explicit_registries() {
        assert_eq!(parse("ghcr.io/org/app"), ("ghcr.io".into(), "org/app".into()));
        assert_eq!(
            parse("123456789.dkr.ecr.ap-northeast-1.amazonaws.com/app"),
            (
                "123456789.dkr.ecr.ap-northeast-1.amazonaws.com".into(),
                "app".into()
            )
        );
        assert_eq!(
            parse("localhost:5000/myapp"),
            ("localhost:5000".into(), "myapp".into())
        );
        assert_eq!(parse("localhost/myapp"), ("localhost".into(), "myapp".into()));
    }

    #[test]
    fn test_scheme() {
        assert_eq!(ImageRef::parse("localhost:5000/app").unwrap().scheme(), "http");
        assert_eq!(ImageRef::parse("ghcr.io/org/app").unwrap().scheme(), "https");
    }

    #[test]
    fn test_invalid_images() {
        assert!(ImageRef::parse("").is_err());
        assert!(ImageRef::parse("/app").is_err());
        assert!(ImageRef::parse("org/").is_err());
    }
}
