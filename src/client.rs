use crate::config::{ResolverConfig, EPSG_IO_URL};
use crate::error::{EpsgError, EpsgResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource formats served by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Gml,
    Wkt,
    EsriWkt,
    Html,
    Proj4,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Gml => "gml",
            Format::Wkt => "wkt",
            Format::EsriWkt => "esriwkt",
            Format::Html => "html",
            Format::Proj4 => "proj4",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Source of raw registry documents.
///
/// [`EpsgClient`] is the HTTP implementation; the resolver only talks to
/// this trait.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Body of the `format` resource for `code`.
    async fn fetch(&self, code: &str, format: Format) -> EpsgResult<String>;
}

/// HTTP client for the epsg.io download endpoints
#[derive(Debug, Clone)]
pub struct EpsgClient {
    client: Client,
    base_url: String,
}

impl EpsgClient {
    /// Create a client for https://epsg.io/
    pub fn new() -> Self {
        Self::with_url(EPSG_IO_URL)
    }

    /// Create with custom base URL
    pub fn with_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    /// Create from a resolver configuration (base URL and timeout)
    pub fn with_config(config: &ResolverConfig) -> EpsgResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: normalize_base_url(config.base_url.clone()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Download URL for `code` in `format`
    pub fn url_for(&self, code: &str, format: Format) -> String {
        format!("{}{}.{}?download", self.base_url, code, format.extension())
    }

    /// GET the `format` resource for `code` and return its body
    pub async fn get_text(&self, code: &str, format: Format) -> EpsgResult<String> {
        let url = self.url_for(code, format);

        tracing::debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(EpsgError::HttpError(format!(
                "HTTP {}: {}",
                response.status(),
                url
            )));
        }

        Ok(response.text().await?)
    }
}

impl Default for EpsgClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetch for EpsgClient {
    async fn fetch(&self, code: &str, format: Format) -> EpsgResult<String> {
        self.get_text(code, format).await
    }
}

fn normalize_base_url(mut base_url: String) -> String {
    if !base_url.ends_with('/') {
        base_url.push('/');
    }
    base_url
}
