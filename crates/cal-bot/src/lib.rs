//! Cal bot library logic.
//!
//! Wires the presence and speech cores to platform events. The platform
//! adapter talks to this crate over the HTTP event bridge built by [`app`].

pub mod actions;
pub mod api;
pub mod commands;
pub mod config;
pub mod context;
pub mod events;
pub mod handlers;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use handlers::Bot;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub bot: Bot,
}

impl AppState {
    pub fn new(config: config::Config) -> Self {
        Self {
            bot: Bot::new(config),
        }
    }
}

const MAX_REQUEST_BODY_BYTES: usize = 256 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events/voice-state", post(api::voice_state_handler))
        .route("/events/message", post(api::message_handler))
        .route("/events/member-join", post(api::member_join_handler))
        .route("/events/ready", post(api::ready_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(Arc::new(state)))
}
