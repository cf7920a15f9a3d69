/// Optional Redis key/value store used to memoize search responses.
///
/// Every operation degrades to a no-op when Redis is unconfigured or unreachable:
/// reads return `None`, writes return `false`, and a warning is logged. Callers
/// always have the in-memory collection to fall back on.
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::warn;

pub struct RedisStore {
    client: Option<redis::Client>,
}

impl RedisStore {
    /// Build a store for `url`. `None` or an unparseable URL yields a disabled store.
    pub fn new(url: Option<&str>) -> Self {
        let client = url.and_then(|u| {
            redis::Client::open(u)
                .inspect_err(|e| warn!(error = %e, url = u, "invalid redis url, search cache disabled"))
                .ok()
        });
        Self { client }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// PING the server. `false` when disabled or unreachable.
    pub async fn is_available(&self) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        let pong: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
        pong.is_ok()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.connection().await?;
        conn.get::<_, Option<String>>(key)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis GET failed"))
            .ok()
            .flatten()
    }

    pub async fn set(&self, key: &str, value: &str) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        conn.set::<_, _, ()>(key, value)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis SET failed"))
            .is_ok()
    }

    pub async fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis SETEX failed"))
            .is_ok()
    }

    /// Delete every key starting with `prefix`, walking the keyspace with SCAN.
    /// Returns the number of keys removed, or `None` if Redis could not be used.
    pub async fn delete_by_prefix(&self, prefix: &str) -> Option<usize> {
        let mut conn = self.connection().await?;
        let pattern = format!("{prefix}*");
        let mut cursor: u64 = 0;
        let mut removed = 0;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .inspect_err(|e| warn!(error = %e, pattern, "redis SCAN failed"))
                .ok()?;

            if !keys.is_empty() {
                conn.del::<_, ()>(&keys)
                    .await
                    .inspect_err(|e| warn!(error = %e, pattern, "redis DEL failed during prefix delete"))
                    .ok()?;
                removed += keys.len();
            }

            cursor = next_cursor;
            if cursor == 0 {
                return Some(removed);
            }
        }
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        let client = self.client.as_ref()?;
        client
            .get_multiplexed_async_connection()
            .await
            .inspect_err(|e| warn!(error = %e, "redis connection failed"))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_store_degrades() {
        let store = RedisStore::new(None);
        assert!(!store.is_enabled());
        assert!(!store.is_available().await);
        assert_eq!(store.get("pfaq:v1:missing").await, None);
        assert!(!store.set("pfaq:v1:key", "value").await);
        assert!(!store.set_with_ttl("pfaq:v1:key", "value", 60).await);
        assert_eq!(store.delete_by_prefix("pfaq:v1:").await, None);
    }

    #[test]
    fn invalid_url_disables_store() {
        let store = RedisStore::new(Some("not a redis url"));
        assert!(!store.is_enabled());
    }

    #[tokio::test]
    async fn round_trip_against_live_redis() {
        let Ok(url) = std::env::var("REDIS_URL") else {
            eprintln!("skipping round_trip_against_live_redis: REDIS_URL not set");
            return;
        };
        let store = RedisStore::new(Some(&url));
        if !store.is_available().await {
            eprintln!("skipping round_trip_against_live_redis: redis unreachable");
            return;
        }
        assert!(store.set_with_ttl("pfaq:test:a", "1", 30).await);
        assert_eq!(store.get("pfaq:test:a").await.as_deref(), Some("1"));
        assert!(store.delete_by_prefix("pfaq:test:").await.is_some_and(|n| n >= 1));
        assert_eq!(store.get("pfaq:test:a").await, None);
    }
}
