mod config;
mod corpus;
mod font;
mod game;
mod models;
mod pipeline;
mod publish;
mod routes;
mod store;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use axum::{http::HeaderValue, Router};
use chrono::Utc;
use config::{Config, PublishTarget, RunMode};
use corpus::EmojiCorpus;
use game::Selector;
use pipeline::{schedule, Orchestrator};
use publish::{CdnInvalidator, FsObjectStore, HttpInvalidator, HttpObjectStore, ObjectStore, Publisher};
use rand::{rngs::StdRng, SeedableRng};
use store::{DailyGameStore, FileRecordStore, RecordStore};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub records: Arc<dyn RecordStore>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stackmoji_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Stackmoji backend...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Load the emoji corpus once; everything else borrows it
    let corpus = EmojiCorpus::load(&config.game.corpus_path)
        .await
        .with_context(|| format!("Failed to load emoji corpus from {}", config.game.corpus_path))?;
    if corpus.len() < config.game.option_count {
        bail!(
            "Emoji corpus has {} entries but OPTION_COUNT is {}",
            corpus.len(),
            config.game.option_count
        );
    }
    let corpus = Arc::new(corpus);

    // Shared HTTP client; its timeout bounds every publish call
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.publish.timeout_secs))
        .build()?;
    tracing::info!("HTTP client initialized");

    let records: Arc<dyn RecordStore> = Arc::new(FileRecordStore::new(&config.storage.record_path));
    let orchestrator = Arc::new(build_orchestrator(&config, corpus, records.clone(), http_client)?);

    if config.scheduler.run_mode == RunMode::Once {
        let mut rng = StdRng::from_os_rng();
        let report = orchestrator.run(Utc::now().date_naive(), &mut rng).await;
        if report.is_failed() {
            bail!("Daily game pipeline failed: {:?}", report.errors);
        }
        return Ok(());
    }

    // Regenerate at every UTC day boundary
    let scheduled = orchestrator.clone();
    let run_on_start = config.scheduler.run_on_start;
    tokio::spawn(async move {
        schedule::daily_generation_task(scheduled, run_on_start).await;
    });

    let state = Arc::new(AppState {
        config: config.clone(),
        records,
    });

    // Configure CORS
    let origin = HeaderValue::from_str(&config.server.frontend_url)
        .context("FRONTEND_URL is not a valid origin")?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([axum::http::Method::GET]);

    // Build router
    let app = Router::new()
        .merge(routes::create_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Daily game: http://{}/api/game/daily", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Wire the configured destinations into a pipeline
fn build_orchestrator(
    config: &Config,
    corpus: Arc<EmojiCorpus>,
    records: Arc<dyn RecordStore>,
    http_client: reqwest::Client,
) -> Result<Orchestrator> {
    let selector = Selector::new(
        config.game.option_count,
        config.game.min_answer,
        config.game.max_answer,
    )?;
    let store = DailyGameStore::new(records, selector);

    let objects: Arc<dyn ObjectStore> = match &config.publish.target {
        PublishTarget::Http(url) => {
            tracing::info!("Publishing to object storage at {}", url);
            Arc::new(HttpObjectStore::new(
                http_client.clone(),
                url.clone(),
                config.publish.auth_token.clone(),
            ))
        }
        PublishTarget::Directory(dir) => {
            tracing::info!("Publishing to directory {}", dir);
            Arc::new(FsObjectStore::new(dir))
        }
    };

    let invalidator: Option<Arc<dyn CdnInvalidator>> = match &config.publish.cdn {
        Some(cdn) => {
            tracing::info!("CDN invalidation enabled for distribution {}", cdn.distribution_id);
            Some(Arc::new(HttpInvalidator::new(
                http_client,
                cdn.invalidation_url.clone(),
                cdn.distribution_id.clone(),
                config.publish.auth_token.clone(),
            )) as Arc<dyn CdnInvalidator>)
        }
        None => {
            tracing::warn!("CDN_DISTRIBUTION_ID not set, cache invalidation disabled");
            None
        }
    };

    let publisher = Publisher::new(
        objects,
        invalidator,
        config.publish.game_data_key.clone(),
        config.publish.font_key.clone(),
    );

    let source_font = config.publish.source_font_path.as_ref().map(PathBuf::from);
    if source_font.is_none() {
        tracing::info!("SOURCE_FONT_PATH not set, subset fonts will not be published");
    }

    Ok(Orchestrator::new(corpus, store, source_font, publisher))
}
