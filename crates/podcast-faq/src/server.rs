use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tokio::sync::RwLock;
use tracing::info;

use crate::cache::FaqCache;
use crate::reload::ReloadService;
use faq_core::mcp_api::{
    CategoriesResponse, CategoryInfo, CategoryListResponse, FaqDetailResponse, FaqMatch,
    FaqSearchHit, FaqSummary, GetFaqParams, ListCategoryParams, ReloadFaqResponse,
    SearchFaqParams, SearchFaqResponse,
};
use faq_core::model::{Category, FaqCollection};
use faq_core::search::{result_summary, SearchResult};

const MAX_RESULTS: u32 = 50;

pub struct AppState {
    pub collection: FaqCollection,
}

#[derive(Clone)]
pub struct PodcastFaqServer {
    state: Arc<RwLock<AppState>>,
    reload_service: Arc<ReloadService>,
    cache: Arc<FaqCache>,
    tool_router: ToolRouter<PodcastFaqServer>,
}

impl PodcastFaqServer {
    pub fn new(
        collection: FaqCollection,
        reload_service: Arc<ReloadService>,
        cache: Arc<FaqCache>,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(AppState { collection })),
            reload_service,
            cache,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl PodcastFaqServer {
    #[tool(description = "Search the podcast FAQ. Returns every question/answer containing any query term, with highlighted snippets, in FAQ order.")]
    async fn search_faq(
        &self,
        Parameters(params): Parameters<SearchFaqParams>,
    ) -> Result<Json<SearchFaqResponse>, String> {
        let query = params.query.trim().to_string();
        let limit = params.limit.map(|l| l.min(MAX_RESULTS) as usize);

        if query.is_empty() {
            return Ok(Json(build_search_response(&query, &[], limit)));
        }

        // the state lock is never held across cache I/O
        let fingerprint = self.state.read().await.collection.fingerprint().to_string();
        if let Some(cached) = self.cache.get_search_response(&fingerprint, &query, limit).await {
            info!(query, "search cache hit");
            return Ok(Json(cached));
        }

        let (fingerprint, response) = {
            let state = self.state.read().await;
            let results = state.collection.search(&query);
            (
                state.collection.fingerprint().to_string(),
                build_search_response(&query, &results, limit),
            )
        };
        self.cache
            .set_search_response(&fingerprint, &query, limit, &response)
            .await;

        Ok(Json(response))
    }

    #[tool(description = "Get a podcast FAQ entry by ID (e.g. 'general-1', 'technical-2').")]
    async fn get_faq(
        &self,
        Parameters(params): Parameters<GetFaqParams>,
    ) -> Result<Json<FaqDetailResponse>, String> {
        let faq_id = params.faq_id.trim().to_string();
        if faq_id.is_empty() {
            return Err("faq_id must not be empty".to_string());
        }

        let state = self.state.read().await;
        let (category, item) = state
            .collection
            .get(&faq_id)
            .ok_or_else(|| format!("faq not found: {faq_id}"))?;

        Ok(Json(FaqDetailResponse {
            id: item.id.clone(),
            question: item.question.clone(),
            answer: item.answer.clone(),
            category: item.category.clone(),
            category_title: category.title.clone(),
        }))
    }

    #[tool(description = "List the questions in one FAQ category, by title ('Technical') or key ('technical').")]
    async fn list_category(
        &self,
        Parameters(params): Parameters<ListCategoryParams>,
    ) -> Result<Json<CategoryListResponse>, String> {
        let name = params.category.trim().to_string();
        if name.is_empty() {
            return Err("category must not be empty".to_string());
        }

        let state = self.state.read().await;
        let category = state.collection.find_category(&name).ok_or_else(|| {
            let available: Vec<&str> = state
                .collection
                .categories()
                .iter()
                .map(|c| c.title.as_str())
                .collect();
            format!(
                "unknown category: '{name}'. Available categories: {}",
                available.join(", ")
            )
        })?;

        let faqs = category
            .items
            .iter()
            .map(|item| FaqSummary {
                id: item.id.clone(),
                question: item.question.clone(),
            })
            .collect();

        Ok(Json(CategoryListResponse {
            category: to_category_info(category),
            faqs,
        }))
    }

    #[tool(description = "List all podcast FAQ categories with their question counts.")]
    async fn list_categories(&self) -> Result<Json<CategoriesResponse>, String> {
        let state = self.state.read().await;
        let categories = state
            .collection
            .categories()
            .iter()
            .map(to_category_info)
            .collect();
        Ok(Json(CategoriesResponse { categories }))
    }

    #[tool(description = "Reload the FAQ dataset from its configured file and swap it in if it changed.")]
    async fn reload_faq(&self) -> Result<Json<ReloadFaqResponse>, String> {
        info!("reload_faq tool invoked");

        let current_fingerprint = self.state.read().await.collection.fingerprint().to_string();
        let (result, new_collection) = self
            .reload_service
            .reload(&current_fingerprint)
            .await
            .map_err(|e| format!("reload failed: {e}"))?;

        if let Some(collection) = new_collection {
            let faq_count = collection.len();
            let mut state = self.state.write().await;
            state.collection = collection;
            info!(faq_count, "in-memory faq collection replaced");
        }

        Ok(Json(ReloadFaqResponse {
            reloaded: result.reloaded,
            source: self.reload_service.source_label(),
            fingerprint: result.fingerprint,
            faq_count: result.faq_count,
            category_count: result.category_count,
        }))
    }
}

fn build_search_response(
    query: &str,
    results: &[SearchResult<'_>],
    limit: Option<usize>,
) -> SearchFaqResponse {
    let total = results.len();
    let hits = results
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|result| FaqSearchHit {
            id: result.item.id.clone(),
            category: result.item.category.clone(),
            question: result.item.question.clone(),
            matches: result.matches.iter().map(FaqMatch::from).collect(),
        })
        .collect();

    SearchFaqResponse {
        query: query.to_string(),
        total,
        summary: result_summary(total),
        results: hits,
    }
}

fn to_category_info(category: &Category) -> CategoryInfo {
    CategoryInfo {
        title: category.title.clone(),
        key: category.key().map(str::to_string),
        faq_count: category.items.len(),
    }
}

#[tool_handler]
impl ServerHandler for PodcastFaqServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "podcast-faq".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Podcast FAQ MCP server. Answers listener questions from the podcast's FAQ. \
                 Use search_faq for free-text queries (snippets highlight matches with <mark>), \
                 get_faq for a specific ID such as general-1, list_categories and list_category \
                 to browse, and reload_faq after editing the dataset file."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use faq_core::dataset::default_collection;
    use faq_core::redis::RedisStore;
    use faq_core::search::MatchField;
    use tokio::net::TcpListener;

    use super::*;
    use crate::config::Config;

    fn server() -> PodcastFaqServer {
        server_with_redis(None)
    }

    fn server_with_redis(redis_url: Option<&str>) -> PodcastFaqServer {
        let cache = Arc::new(FaqCache::new(RedisStore::new(redis_url)));
        let config = Config {
            redis_url: None,
            data_path: None,
            tcp_listen_addr: None,
        };
        let reload_service = Arc::new(ReloadService::new(config, Arc::clone(&cache)));
        PodcastFaqServer::new(default_collection(), reload_service, cache)
    }

    fn search_params(query: &str, limit: Option<u32>) -> Parameters<SearchFaqParams> {
        Parameters(SearchFaqParams {
            query: query.to_string(),
            limit,
        })
    }

    #[test]
    fn tools_publish_output_schemas() {
        let tools = PodcastFaqServer::tool_router().list_all();
        for name in [
            "search_faq",
            "get_faq",
            "list_category",
            "list_categories",
            "reload_faq",
        ] {
            let tool = tools
                .iter()
                .find(|t| t.name == name)
                .unwrap_or_else(|| panic!("missing tool: {name}"));
            assert!(
                tool.output_schema.is_some(),
                "tool {name} should publish output_schema"
            );
        }
    }

    #[tokio::test]
    async fn search_returns_highlighted_hits() {
        let server = server();
        let Json(response) = server
            .search_faq(search_params("  rss feed  ", None))
            .await
            .unwrap();

        assert_eq!(response.query, "rss feed");
        assert_eq!(response.total, response.results.len());
        assert_eq!(response.summary, result_summary(response.total));

        let hit = response
            .results
            .iter()
            .find(|h| h.id == "technical-2")
            .expect("rss faq in results");
        assert_eq!(hit.matches[0].field, MatchField::Question);
        assert_eq!(hit.matches[0].html, "Is there an <mark>RSS</mark> <mark>feed</mark> available?");
        assert_eq!(hit.matches[1].field, MatchField::Answer);
    }

    #[tokio::test]
    async fn blank_search_is_empty_not_error() {
        let Json(response) = server().search_faq(search_params("   ", None)).await.unwrap();
        assert_eq!(response.total, 0);
        assert!(response.results.is_empty());
        assert_eq!(response.summary, "Found 0 matching results");
    }

    #[tokio::test]
    async fn limit_truncates_but_keeps_total() {
        let server = server();
        let Json(all) = server.search_faq(search_params("podcast", None)).await.unwrap();
        let Json(limited) = server.search_faq(search_params("podcast", Some(2))).await.unwrap();
        assert!(all.total > 2);
        assert_eq!(limited.total, all.total);
        assert_eq!(limited.results, all.results[..2].to_vec());
    }

    #[tokio::test]
    async fn get_and_list_lookups() {
        let server = server();
        let Json(detail) = server
            .get_faq(Parameters(GetFaqParams {
                faq_id: "Technical-3".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(detail.id, "technical-3");
        assert_eq!(detail.category_title, "Technical");

        let missing = server
            .get_faq(Parameters(GetFaqParams {
                faq_id: "nope".to_string(),
            }))
            .await;
        assert_eq!(missing.err().as_deref(), Some("faq not found: nope"));

        let Json(list) = server
            .list_category(Parameters(ListCategoryParams {
                category: "participation".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(list.category.title, "Participation");
        assert_eq!(list.faqs.len(), 2);

        let unknown = server
            .list_category(Parameters(ListCategoryParams {
                category: "billing".to_string(),
            }))
            .await
            .err()
            .expect("unknown category is an error");
        assert!(unknown.contains("Content & Episodes"));

        let Json(categories) = server.list_categories().await.unwrap();
        let counts: Vec<usize> = categories.categories.iter().map(|c| c.faq_count).collect();
        assert_eq!(counts, [3, 3, 2, 3]);
    }

    #[tokio::test]
    async fn reload_without_file_keeps_embedded() {
        let Json(response) = server().reload_faq().await.unwrap();
        assert!(!response.reloaded);
        assert_eq!(response.source, "embedded");
        assert_eq!(response.faq_count, 11);
        assert_eq!(response.category_count, 4);
    }

    #[tokio::test]
    async fn stalled_cache_does_not_block_collection_swap() {
        // accepts redis connections but never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let silent = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let server = server_with_redis(Some(&format!("redis://{addr}")));
        let searching = server.clone();
        let search = tokio::spawn(async move {
            searching.search_faq(search_params("podcast", None)).await
        });
        tokio::time::sleep(Duration::from_millis(200)).await;

        let swap = tokio::time::timeout(Duration::from_millis(500), server.state.write()).await;
        assert!(swap.is_ok(), "write lock waited on redis I/O");
        drop(swap);

        search.abort();
        silent.abort();
    }
}
