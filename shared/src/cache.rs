//! Redis-backed caching.
//!
//! Caching is an accelerator, never a source of truth: every read-through
//! helper degrades to "not cached" on failure and reports the failure
//! through tracing, so a Redis outage costs latency, not correctness.

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::error::{DomainError, DomainResult};

pub type RedisPool = ConnectionManager;

/// Connect a Redis pool for the short-TTL lookup caches.
pub async fn create_redis_pool(redis_url: &str) -> DomainResult<RedisPool> {
    let client = Client::open(redis_url)
        .map_err(|e| DomainError::InternalError(format!("Invalid Redis URL: {}", e)))?;

    ConnectionManager::new(client)
        .await
        .map_err(|e| DomainError::InternalError(format!("Redis connection failed: {}", e)))
}

/// Cache key constants
pub mod cache_keys {
    /// Key for a single availability lookup. Absorbs bursts from the
    /// schedule editor probing many cells at once.
    pub fn availability(kind: &str, username: &str, day: u32, hour: u32) -> String {
        format!("availability:{}:{}:{}:{}", kind, username, day, hour)
    }

    /// Pattern matching every availability cache key for a kind
    pub fn availability_pattern(kind: &str) -> String {
        format!("availability:{}:*", kind)
    }

    /// Key for the formatted schedule grid of a kind
    pub fn schedule_grid(kind: &str) -> String {
        format!("schedule:grid:{}", kind)
    }

    /// Pattern to match all schedule grid cache keys
    pub const SCHEDULE_GRID_PATTERN: &str = "schedule:grid:*";
}

/// Cache TTL constants (in seconds)
pub mod cache_ttl {
    /// TTL for availability lookups. Short on purpose: the authoritative
    /// check happens inside the write transaction.
    pub const AVAILABILITY: u64 = 10;

    /// TTL for the formatted schedule grid (5 minutes)
    pub const SCHEDULE_GRID: u64 = 300;
}

/// Drop one cache key. Best-effort.
pub async fn invalidate_cache(redis_conn: &mut ConnectionManager, key: &str) {
    if let Err(error) = redis_conn.del::<_, ()>(key).await {
        tracing::debug!(key, %error, "Cache invalidation failed");
    }
}

/// Drop every key matching a pattern. Best-effort.
pub async fn invalidate_cache_pattern(redis_conn: &mut ConnectionManager, pattern: &str) {
    let keys: Vec<String> = match redis_conn.keys(pattern).await {
        Ok(keys) => keys,
        Err(error) => {
            tracing::debug!(pattern, %error, "Cache key scan failed");
            return;
        }
    };
    if keys.is_empty() {
        return;
    }

    if let Err(error) = redis::cmd("DEL")
        .arg(&keys)
        .query_async::<()>(redis_conn)
        .await
    {
        tracing::debug!(pattern, %error, "Cache invalidation failed");
    }
}

/// Read a cached value. A miss, an unreachable Redis, and an undecodable
/// payload all come back as `None`.
pub async fn get_cached<T: serde::de::DeserializeOwned>(
    redis_conn: &mut ConnectionManager,
    key: &str,
) -> Option<T> {
    let payload: Option<String> = match redis_conn.get(key).await {
        Ok(payload) => payload,
        Err(error) => {
            tracing::debug!(key, %error, "Cache read failed");
            return None;
        }
    };

    let payload = payload?;
    match serde_json::from_str(&payload) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::debug!(key, %error, "Discarding undecodable cache entry");
            None
        }
    }
}

/// Store a value with a TTL. Best-effort.
pub async fn set_cached<T: serde::Serialize>(
    redis_conn: &mut ConnectionManager,
    key: &str,
    value: &T,
    ttl_seconds: u64,
) {
    let payload = match serde_json::to_string(value) {
        Ok(payload) => payload,
        Err(error) => {
            tracing::warn!(key, %error, "Refusing to cache unserializable value");
            return;
        }
    };

    if let Err(error) = redis_conn.set_ex::<_, _, ()>(key, payload, ttl_seconds).await {
        tracing::debug!(key, %error, "Cache write failed");
    }
}
