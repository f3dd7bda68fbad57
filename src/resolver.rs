use crate::cache::ObjectCache;
use crate::client::{EpsgClient, Fetch, Format};
use crate::config::{CachePolicy, ResolverConfig};
use crate::error::EpsgResult;
use crate::models::{Code, Definition, EpsgObject, ObjectKind};
use crate::parser::Element;
use std::fmt;
use std::sync::Arc;

/// EPSG resolver - main entry point for looking up registry objects
#[derive(Clone)]
pub struct Resolver {
    inner: Arc<ResolverInner>,
}

struct ResolverInner {
    fetcher: Arc<dyn Fetch>,
    cache: ObjectCache,
    cache_policy: CachePolicy,
}

impl Resolver {
    /// Create a resolver for https://epsg.io/ with weak caching
    pub fn new() -> EpsgResult<Self> {
        Self::with_config(ResolverConfig::default())
    }

    /// Create from an explicit configuration
    pub fn with_config(config: ResolverConfig) -> EpsgResult<Self> {
        let client = EpsgClient::with_config(&config)?;
        Ok(Self::with_fetcher(Arc::new(client), config.cache_policy))
    }

    /// Create on top of any document source
    pub fn with_fetcher(fetcher: Arc<dyn Fetch>, cache_policy: CachePolicy) -> Self {
        Self {
            inner: Arc::new(ResolverInner {
                fetcher,
                cache: ObjectCache::new(&cache_policy),
                cache_policy,
            }),
        }
    }

    pub fn cache_policy(&self) -> &CachePolicy {
        &self.inner.cache_policy
    }

    /// Return the object registered under `code`.
    ///
    /// Cached objects are returned without network access; otherwise the
    /// GML document is fetched and classified by its root element.
    pub async fn resolve(&self, code: impl Into<Code>) -> EpsgResult<EpsgObject> {
        let code = code.into();
        code.validate()?;

        let definition = self
            .inner
            .cache
            .get_or_try_insert_with(code.as_str(), || self.load(&code))
            .await?;

        Ok(EpsgObject::from_definition(definition, self.clone()))
    }

    async fn load(&self, code: &Code) -> EpsgResult<Arc<Definition>> {
        tracing::info!("Resolving EPSG code: {}", code);

        let xml = self.fetch(code.as_str(), Format::Gml).await?;
        let root = Element::parse(&xml)?;
        let kind = ObjectKind::classify(root.name())?;

        tracing::debug!("Code {} is a {}", code, kind);

        Ok(Arc::new(Definition::new(code.clone(), kind, root)))
    }

    pub(crate) async fn fetch(&self, code: &str, format: Format) -> EpsgResult<String> {
        self.inner.fetcher.fetch(code, format).await
    }

    /// Drop a single cached object
    pub async fn evict(&self, code: impl Into<Code>) {
        self.inner.cache.invalidate(code.into().as_str()).await;
    }

    /// Clear the cache
    pub fn clear_cache(&self) {
        self.inner.cache.invalidate_all();
    }

    /// Number of objects currently served from the cache
    pub async fn cached_entries(&self) -> u64 {
        self.inner.cache.entry_count().await
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("cache_policy", &self.inner.cache_policy)
            .finish_non_exhaustive()
    }
}
