mod advisor;
mod analytics;
mod config;
mod editor;
mod errors;
mod lint;
mod models;
mod routes;
mod state;
mod storage;
mod transfer;
mod versions;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::advisor::{OpenAiAdvisor, SuggestionProvider};
use crate::config::Config;
use crate::editor::{Autosaver, DocumentStore};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{FileStore, KvStore};
use crate::versions::VersionArchive;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Studio v{}", env!("CARGO_PKG_VERSION"));

    let files = FileStore::open(&config.data_dir).await?;
    info!("Document and versions stored under {}", files.dir().display());
    let kv: Arc<dyn KvStore> = Arc::new(files);

    let store = Arc::new(DocumentStore::load(kv.as_ref()).await);
    let archive = Arc::new(VersionArchive::open(Arc::clone(&kv)).await);
    let autosaver = Autosaver::spawn(&store, Arc::clone(&kv), config.autosave_debounce());

    let advisor = build_advisor(&config)?;

    let state = AppState {
        store,
        archive,
        advisor,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("127.0.0.1:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Persist any edit still waiting out its debounce window.
    autosaver.shutdown().await;
    info!("Shut down cleanly");

    Ok(())
}

fn build_advisor(config: &Config) -> Result<Option<Arc<dyn SuggestionProvider>>> {
    match (&config.openai_api_key, config.ai_enabled()) {
        (Some(key), true) => {
            let advisor = OpenAiAdvisor::new(key.clone())?;
            info!("AI suggestions enabled (model: {})", advisor::MODEL);
            Ok(Some(Arc::new(advisor)))
        }
        _ => {
            if config.enable_ai {
                warn!("ENABLE_AI is set but OPENAI_API_KEY is missing; AI suggestions disabled");
            } else {
                info!("AI suggestions disabled");
            }
            Ok(None)
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
