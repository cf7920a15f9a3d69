/// Redis memoization for the podcast FAQ server.
///
/// All operations degrade gracefully; the server answers from memory without Redis.
///
/// Key schema:
/// - `pfaq:v1:search:{sha256(fingerprint|query|limit)}` — JSON SearchFaqResponse (TTL 3600s)
/// - `pfaq:v1:fingerprint` — fingerprint of the dataset the cached responses belong to
use sha2::{Digest, Sha256};
use tracing::warn;

use faq_core::mcp_api::SearchFaqResponse;
use faq_core::redis::RedisStore;

const KEY_PREFIX: &str = "pfaq:v1:";
const SEARCH_TTL_SECS: u64 = 3600;

pub struct FaqCache {
    redis: RedisStore,
}

impl FaqCache {
    pub fn new(redis: RedisStore) -> Self {
        Self { redis }
    }

    pub async fn is_available(&self) -> bool {
        self.redis.is_available().await
    }

    pub async fn get_search_response(
        &self,
        fingerprint: &str,
        query: &str,
        limit: Option<usize>,
    ) -> Option<SearchFaqResponse> {
        if !self.redis.is_enabled() {
            return None;
        }
        let key = search_key(fingerprint, query, limit);
        let json = self.redis.get(&key).await?;
        serde_json::from_str(&json)
            .inspect_err(|e| warn!(error = %e, key, "cache deserialization failed"))
            .ok()
    }

    pub async fn set_search_response(
        &self,
        fingerprint: &str,
        query: &str,
        limit: Option<usize>,
        response: &SearchFaqResponse,
    ) {
        if !self.redis.is_enabled() {
            return;
        }
        let key = search_key(fingerprint, query, limit);
        if let Ok(json) = serde_json::to_string(response) {
            self.redis.set_with_ttl(&key, &json, SEARCH_TTL_SECS).await;
        }
    }

    pub async fn get_fingerprint(&self) -> Option<String> {
        let key = format!("{KEY_PREFIX}fingerprint");
        self.redis.get(&key).await
    }

    pub async fn set_fingerprint(&self, fingerprint: &str) {
        let key = format!("{KEY_PREFIX}fingerprint");
        self.redis.set(&key, fingerprint).await;
    }

    /// Drop every cached entry. Returns the number of keys removed when Redis was reachable.
    pub async fn invalidate_all(&self) -> Option<usize> {
        self.redis.delete_by_prefix(KEY_PREFIX).await
    }
}

fn search_key(fingerprint: &str, query: &str, limit: Option<usize>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(fingerprint.as_bytes());
    hasher.update(b"|");
    hasher.update(query.as_bytes());
    hasher.update(b"|");
    match limit {
        Some(limit) => hasher.update(limit.to_string().as_bytes()),
        None => hasher.update(b"all"),
    }
    let hash = hasher.finalize();
    format!("{KEY_PREFIX}search:{:x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_key_is_stable_and_distinct() {
        let key = search_key("abc", "podcast", Some(10));
        assert!(key.starts_with("pfaq:v1:search:"));
        assert_eq!(key.len(), "pfaq:v1:search:".len() + 64);
        assert_eq!(key, search_key("abc", "podcast", Some(10)));

        assert_ne!(key, search_key("abd", "podcast", Some(10)));
        assert_ne!(key, search_key("abc", "podcasts", Some(10)));
        assert_ne!(key, search_key("abc", "podcast", Some(11)));
        assert_ne!(key, search_key("abc", "podcast", None));
    }

    #[tokio::test]
    async fn disabled_cache_misses_quietly() {
        let cache = FaqCache::new(RedisStore::new(None));
        assert!(!cache.is_available().await);
        assert!(cache.get_search_response("abc", "podcast", None).await.is_none());
        assert!(cache.get_fingerprint().await.is_none());
        assert!(cache.invalidate_all().await.is_none());
    }
}
