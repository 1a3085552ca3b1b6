//! profmatch server - recommendation API
//!
//! HTTP surface over [`MatchService`]. Student identity arrives as a path
//! parameter; authentication happens upstream.

pub mod http;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use profmatch_core::{MatchConfig, MatchService, Repository, Result};

/// Shared application state
pub struct AppState {
    pub service: MatchService<Repository>,
    pub config: MatchConfig,
}

impl AppState {
    pub fn new(repository: Repository, config: MatchConfig) -> Self {
        Self {
            service: MatchService::new(repository, config.scoring),
            config,
        }
    }

    /// Open the configured database, creating its directory if needed.
    pub fn open(config: MatchConfig) -> Result<Self> {
        config.validate()?;

        let db_path = &config.server.database_path;
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(profmatch_core::PersistenceError::from)?;
            }
        }

        let repository = Repository::new(db_path)?;
        if config.server.install_catalog {
            repository.install_feature_catalog()?;
        } else {
            tracing::warn!("Feature catalog installation disabled; submissions need a populated catalog");
        }
        tracing::info!("Opened database at {:?}", db_path);

        Ok(Self::new(repository, config))
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Student endpoints
        .route("/students/{id}/profile", post(http::submit_profile))
        .route(
            "/students/{id}/recommendations",
            get(http::get_recommendations),
        )
        // Professor endpoints
        .route("/professors/{id}/averages", get(http::get_professor_averages))
        // Catalog endpoints
        .route("/subjects", get(http::list_subjects))
        .route("/features", get(http::list_features))
        // System endpoints
        .route("/status", get(http::get_status))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server
pub async fn serve(addr: &str, state: Arc<AppState>) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("profmatch server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
