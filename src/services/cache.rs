use redis::aio::ConnectionManager;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Cached entries, keyed by the user they belong to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Profile document. Carries `isOnline` and `lastActive`, which the
    /// filters and scorers read, so it must not live long.
    Profile(String),
    /// Match statistics, dropped whenever one of the user's pairs changes
    Statistics(String),
}

impl CacheKey {
    pub fn profile(user_id: &str) -> Self {
        CacheKey::Profile(user_id.to_string())
    }

    pub fn statistics(user_id: &str) -> Self {
        CacheKey::Statistics(user_id.to_string())
    }

    /// Key under which the entry is shared in Redis
    pub fn redis_key(&self) -> String {
        match self {
            CacheKey::Profile(user_id) => format!("profile:{}", user_id),
            CacheKey::Statistics(user_id) => format!("stats:{}", user_id),
        }
    }
}

/// Lifetime of each kind of entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub profile: Duration,
    pub statistics: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            profile: Duration::from_secs(30),
            statistics: Duration::from_secs(300),
        }
    }
}

impl CacheTtls {
    pub fn for_key(&self, key: &CacheKey) -> Duration {
        match key {
            CacheKey::Profile(_) => self.profile,
            CacheKey::Statistics(_) => self.statistics,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    json: Arc<str>,
    ttl: Duration,
}

/// Expires every in-process entry after its own TTL
struct EntryExpiry;

impl moka::Expiry<CacheKey, Entry> for EntryExpiry {
    fn expire_after_create(&self, _key: &CacheKey, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Two-tier cache for profiles and statistics
///
/// The in-process tier sits in front of Redis. An entry pulled from Redis
/// only keeps the TTL Redis has left for it, so a value is never served
/// for longer than its kind allows.
pub struct CacheManager {
    redis: ConnectionManager,
    local: moka::future::Cache<CacheKey, Entry>,
    ttls: CacheTtls,
}

impl CacheManager {
    pub async fn new(redis_url: &str, local_capacity: u64, ttls: CacheTtls) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        let local = moka::future::Cache::builder()
            .max_capacity(local_capacity)
            .expire_after(EntryExpiry)
            .build();

        Ok(Self { redis, local, ttls })
    }

    /// Look an entry up; `Ok(None)` on a miss
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>, CacheError> {
        if let Some(entry) = self.local.get(key).await {
            tracing::trace!("Local cache hit: {:?}", key);
            return Ok(Some(serde_json::from_str(&entry.json)?));
        }

        let redis_key = key.redis_key();
        let mut pipe = redis::pipe();
        pipe.cmd("GET").arg(&redis_key).cmd("PTTL").arg(&redis_key);

        let mut conn = self.redis.clone();
        let (json, remaining_ms): (Option<String>, i64) = pipe.query_async(&mut conn).await?;

        let Some(json) = json else {
            tracing::trace!("Cache miss: {:?}", key);
            return Ok(None);
        };

        let value = serde_json::from_str(&json)?;
        let ttl = match u64::try_from(remaining_ms) {
            Ok(ms) if ms > 0 => Duration::from_millis(ms).min(self.ttls.for_key(key)),
            _ => self.ttls.for_key(key),
        };
        self.local
            .insert(key.clone(), Entry { json: json.into(), ttl })
            .await;

        tracing::trace!("Redis cache hit: {:?}", key);
        Ok(Some(value))
    }

    /// Look an entry up, treating any cache failure as a miss
    pub async fn get_or_bypass<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        match self.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Cache read failed for {:?}, bypassing: {}", key, e);
                None
            }
        }
    }

    /// Store an entry in both tiers with the TTL of its kind
    pub async fn set<T: Serialize>(&self, key: &CacheKey, value: &T) -> Result<(), CacheError> {
        let json = serde_json::to_string(value)?;
        let ttl = self.ttls.for_key(key);

        self.local
            .insert(key.clone(), Entry { json: Arc::from(json.as_str()), ttl })
            .await;

        let mut conn = self.redis.clone();
        let (): () = redis::cmd("SETEX")
            .arg(key.redis_key())
            .arg(ttl.as_secs().max(1))
            .arg(json)
            .query_async(&mut conn)
            .await?;

        tracing::trace!("Cache set: {:?} ({}s)", key, ttl.as_secs());
        Ok(())
    }

    /// Drop entries from both tiers with a single Redis round trip
    pub async fn invalidate(&self, keys: &[CacheKey]) -> Result<(), CacheError> {
        if keys.is_empty() {
            return Ok(());
        }

        for key in keys {
            self.local.invalidate(key).await;
        }

        let mut conn = self.redis.clone();
        let redis_keys: Vec<String> = keys.iter().map(CacheKey::redis_key).collect();
        let (): () = redis::cmd("DEL").arg(redis_keys).query_async(&mut conn).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_keys() {
        assert_eq!(CacheKey::profile("user123").redis_key(), "profile:user123");
        assert_eq!(CacheKey::statistics("user123").redis_key(), "stats:user123");
    }

    #[test]
    fn test_profiles_expire_before_statistics() {
        let ttls = CacheTtls::default();
        assert!(ttls.for_key(&CacheKey::profile("u")) < ttls.for_key(&CacheKey::statistics("u")));
    }

    #[test]
    fn test_entry_expiry_uses_entry_ttl() {
        use moka::Expiry;

        let entry = Entry { json: Arc::from("{}"), ttl: Duration::from_secs(7) };
        let expires = EntryExpiry.expire_after_create(&CacheKey::profile("u"), &entry, Instant::now());

        assert_eq!(expires, Some(Duration::from_secs(7)));
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_set_get_invalidate() {
        let cache = CacheManager::new("redis://127.0.0.1:6379", 100, CacheTtls::default())
            .await
            .expect("Failed to create cache");
        let key = CacheKey::statistics("cache_test_user");

        cache.set(&key, &42u32).await.unwrap();
        assert_eq!(cache.get::<u32>(&key).await.unwrap(), Some(42));

        cache.invalidate(&[key.clone(), CacheKey::profile("cache_test_user")]).await.unwrap();
        assert_eq!(cache.get::<u32>(&key).await.unwrap(), None);
        assert!(cache.get_or_bypass::<u32>(&key).await.is_none());
    }
}
