use crate::config::CachePolicy;
use crate::error::{EpsgError, EpsgResult};
use crate::models::Definition;
use moka::future::Cache;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::OnceCell;

/// One key of the weak map. Empty while its first load is in flight.
type WeakSlot = Arc<OnceCell<Weak<Definition>>>;

type WeakEntries = Mutex<HashMap<String, WeakSlot>>;

/// Definitions keyed by the code they were resolved from.
pub(crate) enum ObjectCache {
    /// Entries die with the last outside reference.
    Weak(WeakEntries),
    /// Entries live until evicted by capacity, TTL or an explicit call.
    Strong(Cache<String, Arc<Definition>>),
}

impl ObjectCache {
    pub(crate) fn new(policy: &CachePolicy) -> Self {
        match policy {
            CachePolicy::Weak => ObjectCache::Weak(Mutex::new(HashMap::new())),
            CachePolicy::Unbounded => {
                ObjectCache::Strong(Cache::<String, Arc<Definition>>::builder().build())
            }
            CachePolicy::Bounded {
                max_capacity,
                time_to_live_secs,
            } => {
                let mut builder =
                    Cache::<String, Arc<Definition>>::builder().max_capacity(*max_capacity);
                if let Some(secs) = time_to_live_secs {
                    builder = builder.time_to_live(Duration::from_secs(*secs));
                }
                ObjectCache::Strong(builder.build())
            }
        }
    }

    /// Return the cached definition for `key`, or run `init` and store its
    /// result. Concurrent callers for one key share a single load, and at
    /// most one live definition per key is ever handed out.
    pub(crate) async fn get_or_try_insert_with<I, F>(
        &self,
        key: &str,
        init: I,
    ) -> EpsgResult<Arc<Definition>>
    where
        I: Fn() -> F,
        F: Future<Output = EpsgResult<Arc<Definition>>>,
    {
        match self {
            ObjectCache::Weak(entries) => {
                let init = &init;
                loop {
                    let slot = weak_slot(entries, key);
                    let mut loaded = None;
                    let loaded_here = &mut loaded;
                    let weak = slot
                        .get_or_try_init(|| async move {
                            let definition = init().await?;
                            let weak = Arc::downgrade(&definition);
                            *loaded_here = Some(definition);
                            Ok::<_, EpsgError>(weak)
                        })
                        .await?;

                    if let Some(definition) = loaded {
                        return Ok(definition);
                    }
                    if let Some(hit) = weak.upgrade() {
                        tracing::debug!("Cache hit for code: {}", key);
                        return Ok(hit);
                    }
                    // Loaded by another caller and already released; the dead
                    // slot is pruned on the next pass.
                }
            }
            ObjectCache::Strong(cache) => {
                if let Some(hit) = cache.get(key).await {
                    tracing::debug!("Cache hit for code: {}", key);
                    return Ok(hit);
                }

                // Concurrent loads of one key share a single `init`.
                cache
                    .try_get_with(key.to_string(), init())
                    .await
                    .map_err(|err| (*err).clone())
            }
        }
    }

    pub(crate) async fn invalidate(&self, key: &str) {
        match self {
            ObjectCache::Weak(entries) => {
                lock(entries).remove(key);
            }
            ObjectCache::Strong(cache) => cache.invalidate(key).await,
        }
    }

    pub(crate) fn invalidate_all(&self) {
        match self {
            ObjectCache::Weak(entries) => lock(entries).clear(),
            ObjectCache::Strong(cache) => cache.invalidate_all(),
        }
    }

    /// Number of entries that would currently be served as hits.
    pub(crate) async fn entry_count(&self) -> u64 {
        match self {
            ObjectCache::Weak(entries) => lock(entries)
                .values()
                .filter(|slot| slot.get().is_some_and(|entry| entry.strong_count() > 0))
                .count() as u64,
            ObjectCache::Strong(cache) => {
                cache.run_pending_tasks().await;
                cache.entry_count()
            }
        }
    }
}

fn lock(entries: &WeakEntries) -> MutexGuard<'_, HashMap<String, WeakSlot>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

fn is_dead(slot: &WeakSlot) -> bool {
    slot.get().is_some_and(|entry| entry.strong_count() == 0)
}

/// The live or in-flight slot for `key`, or a fresh empty one.
fn weak_slot(entries: &WeakEntries, key: &str) -> WeakSlot {
    let mut map = lock(entries);
    map.retain(|_, slot| !is_dead(slot));
    map.entry(key.to_string()).or_default().clone()
}
