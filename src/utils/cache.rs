use moka::future::Cache as MokaCache;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::fmt::Display;
use std::time::Duration;

/// Cache tier types for different data characteristics
#[derive(Debug, Clone, Copy)]
pub enum CacheTier {
    /// Long-lived data (5 minutes TTL) - module classifications
    LongTerm,
    /// Frequently changing data (30 seconds TTL) - Safe module lists
    ShortTerm,
}

/// Cache manager that provides unified access to different cache tiers
#[derive(Clone)]
pub struct Cache {
    /// Long-term cache (5 minutes TTL)
    pub long_term: MokaCache<String, Value>,
    /// Short-term cache (30 seconds TTL)
    pub short_term: MokaCache<String, Value>,
}

#[derive(Debug)]
pub enum CacheError {
    Serialize(String),
    Deserialize(String),
}

impl Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::Serialize(msg) => write!(f, "Failed to serialize result: {}", msg),
            CacheError::Deserialize(msg) => write!(f, "Failed to deserialize cached data: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {}

impl Cache {
    /// Create a new Cache manager with default configuration
    /// - Long-term cache: 10,000 entries, 5 minutes TTL
    /// - Short-term cache: 1,000 entries, 30 seconds TTL
    pub fn new() -> Self {
        let long_term = MokaCache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let short_term = MokaCache::builder()
            .max_capacity(1_000)
            .time_to_live(Duration::from_secs(30)) // 30 seconds
            .build();

        Self {
            long_term,
            short_term,
        }
    }

    fn get_cache(&self, tier: CacheTier) -> &MokaCache<String, Value> {
        match tier {
            CacheTier::LongTerm => &self.long_term,
            CacheTier::ShortTerm => &self.short_term,
        }
    }

    /// Cached function execution that returns the deserialized type
    ///
    /// Checks the tier first; on a miss runs `fetch_fn`, stores the result as
    /// JSON and returns it. Errors from `fetch_fn` are returned as-is and are
    /// never cached.
    pub async fn cached<F, T, E>(&self, tier: CacheTier, cache_key: String, fetch_fn: F) -> Result<T, E>
    where
        F: std::future::Future<Output = Result<T, E>>,
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
    {
        let cache = self.get_cache(tier);

        if let Some(cached_data) = cache.get(&cache_key).await {
            return serde_json::from_value(cached_data).map_err(|e| {
                log::error!("Error deserializing cached data for {}: {}", cache_key, e);
                CacheError::Deserialize(e.to_string()).into()
            });
        }

        let result = fetch_fn.await?;

        let result_value = serde_json::to_value(&result).map_err(|e| {
            log::error!("Error serializing result for {}: {}", cache_key, e);
            CacheError::Serialize(e.to_string())
        })?;

        cache.insert(cache_key, result_value).await;

        Ok(result)
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper to build consistent cache keys across the application
pub struct CacheKey {
    namespace: String,
    parts: Vec<String>,
}

impl CacheKey {
    /// Create a new cache key with a namespace
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            parts: Vec::new(),
        }
    }

    /// Add a part to the cache key
    pub fn with(mut self, part: impl Display) -> Self {
        self.parts.push(part.to_string());
        self
    }

    /// Build the final cache key string
    pub fn build(self) -> String {
        if self.parts.is_empty() {
            self.namespace
        } else {
            format!("{}:{}", self.namespace, self.parts.join(":"))
        }
    }
}
