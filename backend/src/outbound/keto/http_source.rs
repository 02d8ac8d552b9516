//! Reqwest-backed keto source adapter.
//!
//! Owns transport details only: URL construction, RapidAPI headers, timeout
//! and status mapping, and JSON decoding. Payloads are passed through as
//! `serde_json::Value`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::domain::ports::{KetoCategoryId, KetoRecipeSource, KetoSourceError};

const RAPIDAPI_HOST_HEADER: &str = "x-rapidapi-host";
const RAPIDAPI_KEY_HEADER: &str = "x-rapidapi-key";
const PREVIEW_CHAR_LIMIT: usize = 160;

/// RapidAPI credentials sent with every request.
#[derive(Clone, Default)]
pub struct KetoHttpIdentity {
    /// Value of the `x-rapidapi-host` header.
    pub host: String,
    /// Value of the `x-rapidapi-key` header; sent empty when absent.
    pub api_key: Option<String>,
}

impl std::fmt::Debug for KetoHttpIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KetoHttpIdentity")
            .field("host", &self.host)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Keto source adapter that issues GET requests against one base URL.
pub struct KetoHttpSource {
    client: Client,
    base: Url,
    identity: KetoHttpIdentity,
}

impl KetoHttpSource {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        timeout: Duration,
        identity: KetoHttpIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: with_trailing_slash(base),
            identity,
        })
    }

    fn categories_url(&self) -> Result<Url, KetoSourceError> {
        self.base
            .join("categories/")
            .map_err(|err| KetoSourceError::transport(format!("invalid keto URL: {err}")))
    }

    fn recipes_url(&self, category: KetoCategoryId) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("category", &category.get().to_string());
        url
    }

    async fn fetch(&self, url: Url) -> Result<Value, KetoSourceError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(RAPIDAPI_HOST_HEADER, self.identity.host.as_str())
            .header(
                RAPIDAPI_KEY_HEADER,
                self.identity.api_key.as_deref().unwrap_or_default(),
            )
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_payload(body.as_ref())
    }
}

#[async_trait]
impl KetoRecipeSource for KetoHttpSource {
    async fn list_categories(&self) -> Result<Value, KetoSourceError> {
        let url = self.categories_url()?;
        self.fetch(url).await
    }

    async fn list_recipes(&self, category: KetoCategoryId) -> Result<Value, KetoSourceError> {
        self.fetch(self.recipes_url(category)).await
    }
}

fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn parse_payload(body: &[u8]) -> Result<Value, KetoSourceError> {
    serde_json::from_slice(body)
        .map_err(|error| KetoSourceError::decode(format!("invalid keto JSON payload: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> KetoSourceError {
    if error.is_timeout() {
        KetoSourceError::timeout(error.to_string())
    } else {
        KetoSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> KetoSourceError {
    KetoSourceError::status(status.as_u16(), body_preview(body))
}

fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
