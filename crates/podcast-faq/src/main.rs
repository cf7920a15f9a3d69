mod cache;
mod config;
mod error;
mod loader;
mod reload;
mod server;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cache::FaqCache;
use config::Config;
use reload::ReloadService;
use server::PodcastFaqServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout is reserved for MCP JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting podcast-faq MCP server");

    let config = Config::from_env()?;
    info!(
        source = %config.source_label(),
        redis = config.redis_url.is_some(),
        tcp = config.tcp_listen_addr.is_some(),
        "configuration loaded"
    );

    let redis_store = faq_core::redis::RedisStore::new(config.redis_url.as_deref());
    let cache = Arc::new(FaqCache::new(redis_store));
    if cache.is_available().await {
        info!("redis connected");
    } else {
        info!("redis unavailable, running without search cache");
    }

    let reload_service = Arc::new(ReloadService::new(config.clone(), Arc::clone(&cache)));
    let collection = reload_service.load()?;
    info!(
        fingerprint = collection.fingerprint(),
        faqs = collection.len(),
        categories = collection.categories().len(),
        "faq dataset loaded"
    );
    reload_service.sync_cache(&collection).await;

    let server = PodcastFaqServer::new(collection, reload_service, cache);

    if let Some(addr) = config.tcp_listen_addr.as_deref() {
        let listener = TcpListener::bind(addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = server.clone();
            tokio::spawn(async move {
                info!(peer = %peer, "MCP client connected");
                let service = server.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            tracing::error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}
