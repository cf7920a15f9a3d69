/// Dataset reload service.
///
/// Re-reads the configured FAQ file and swaps it in when its fingerprint changes.
/// Runs at startup to sync the search cache and on demand via the `reload_faq` tool.
use std::sync::Arc;

use tracing::info;

use faq_core::model::FaqCollection;

use crate::cache::FaqCache;
use crate::config::Config;
use crate::error::AppError;
use crate::loader;

/// Result of a reload.
#[derive(Debug)]
pub struct ReloadResult {
    /// Whether a different dataset is now being served.
    pub reloaded: bool,
    pub fingerprint: String,
    pub faq_count: usize,
    pub category_count: usize,
}

impl ReloadResult {
    fn for_collection(collection: &FaqCollection, reloaded: bool) -> Self {
        Self {
            reloaded,
            fingerprint: collection.fingerprint().to_string(),
            faq_count: collection.len(),
            category_count: collection.categories().len(),
        }
    }
}

pub struct ReloadService {
    config: Config,
    cache: Arc<FaqCache>,
}

impl ReloadService {
    pub fn new(config: Config, cache: Arc<FaqCache>) -> Self {
        Self { config, cache }
    }

    pub fn source_label(&self) -> String {
        self.config.source_label()
    }

    /// Load the configured dataset for the first time.
    pub fn load(&self) -> Result<FaqCollection, AppError> {
        loader::load_collection(self.config.data_path().as_deref())
    }

    /// Make sure cached search responses belong to `collection`, dropping them if not.
    pub async fn sync_cache(&self, collection: &FaqCollection) {
        let current = collection.fingerprint();
        match self.cache.get_fingerprint().await {
            Some(cached) if cached == current => {
                info!(fingerprint = current, "search cache matches dataset");
            }
            cached => {
                let removed = self.cache.invalidate_all().await;
                self.cache.set_fingerprint(current).await;
                if cached.is_some() || removed.is_some() {
                    info!(fingerprint = current, removed = ?removed, "search cache reset for dataset");
                }
            }
        }
    }

    /// Re-read the dataset and compare it to the one being served.
    ///
    /// Returns the new collection only when its content changed. The embedded dataset
    /// never changes at runtime.
    pub async fn reload(
        &self,
        current_fingerprint: &str,
    ) -> Result<(ReloadResult, Option<FaqCollection>), AppError> {
        let Some(path) = self.config.data_path() else {
            info!("no dataset file configured, embedded faq is current");
            let collection = loader::load_collection(None)?;
            return Ok((ReloadResult::for_collection(&collection, false), None));
        };

        let collection = loader::load_collection_file(&path)?;
        if collection.fingerprint() == current_fingerprint {
            info!(path = %path.display(), "faq dataset unchanged");
            return Ok((ReloadResult::for_collection(&collection, false), None));
        }

        info!(
            path = %path.display(),
            fingerprint = collection.fingerprint(),
            faqs = collection.len(),
            "faq dataset changed, reloading"
        );
        self.sync_cache(&collection).await;
        Ok((ReloadResult::for_collection(&collection, true), Some(collection)))
    }
}
