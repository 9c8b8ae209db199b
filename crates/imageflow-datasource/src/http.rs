//! JSON over HTTP with pagination

use crate::error::{DatasourceError, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, LINK, USER_AGENT};
use serde::de::DeserializeOwned;

/// Upper bound on pages fetched for one lookup
pub const MAX_PAGES: usize = 10;

pub(crate) const USER_AGENT_VALUE: &str = concat!("imageflow/", env!("CARGO_PKG_VERSION"));

/// One fetched page: the decoded body plus the raw response headers.
pub(crate) struct Page<T> {
    pub body: T,
    pub headers: HeaderMap,
}

#[derive(Debug, Clone)]
pub(crate) struct JsonClient {
    client: reqwest::Client,
}

impl JsonClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        accept: &str,
        bearer: Option<&str>,
    ) -> Result<Page<T>> {
        tracing::debug!("GET {}", url);

        let mut request = self
            .client
            .get(url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(ACCEPT, accept);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DatasourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        let body = serde_json::from_slice(&bytes).map_err(|source| DatasourceError::Decode {
            url: url.to_string(),
            source,
        })?;

        Ok(Page { body, headers })
    }
}

/// Extracts the `rel="next"` target from an RFC 8288 `Link` header.
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(LINK)?.to_str().ok()?;
    parse_next_link(value)
}

fn parse_next_link(value: &str) -> Option<String> {
    value.split(',').find_map(|part| {
        let mut sections = part.split(';');
        let target = sections.next()?.trim();
        let is_next = sections.any(|param| {
            let param = param.trim();
            param == r#"rel="next""# || param == "rel=next"
        });
        if is_next {
            target
                .strip_prefix('<')
                .and_then(|t| t.strip_suffix('>'))
                .map(String::from)
        } else {
            None
        }
    })
}
