use crate::error::EpsgResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default registry endpoint.
pub const EPSG_IO_URL: &str = "https://epsg.io/";

/// How the resolver keeps objects it has already fetched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CachePolicy {
    /// Keep an object only while a caller still holds it.
    #[default]
    Weak,
    /// Keep every object until it is evicted explicitly.
    Unbounded,
    /// Keep at most `max_capacity` objects, optionally expiring them.
    Bounded {
        max_capacity: u64,
        #[serde(default)]
        time_to_live_secs: Option<u64>,
    },
}

/// Resolver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub base_url: String,
    pub cache_policy: CachePolicy,
    /// Request timeout in milliseconds; the transport default applies when unset.
    pub timeout_ms: Option<u64>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: EPSG_IO_URL.to_string(),
            cache_policy: CachePolicy::default(),
            timeout_ms: None,
        }
    }
}

impl ResolverConfig {
    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> EpsgResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_cache_policy(mut self, cache_policy: CachePolicy) -> Self {
        self.cache_policy = cache_policy;
        self
    }

    /// Set the request timeout. Sub-millisecond remainders round up so a
    /// non-zero duration never becomes a zero timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_nanos().div_ceil(1_000_000);
        self.timeout_ms = Some(u64::try_from(millis).unwrap_or(u64::MAX));
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
