//! colony-server library
//!
//! HTTP API over the colony database: accounts, strains, cages and mice.

use axum::Router;
use colony_common::config::WechatConfig;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// Mini-program credentials for exchanging login codes
    pub wechat: WechatConfig,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(db: SqlitePool, wechat: WechatConfig) -> Self {
        Self {
            db,
            wechat,
            http: reqwest::Client::new(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::auth_routes())
        .merge(api::strain_routes())
        .merge(api::cage_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
