//! HTTP handlers for the event bridge.
//!
//! The platform adapter posts every event it receives and performs the
//! actions in the response, in order.

use crate::actions::ActionList;
use crate::events::{MemberJoinEvent, MessageEvent, VoiceStateEvent};
use crate::AppState;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use thiserror::Error;

/// Longest message content the bridge accepts, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Handler for `POST /events/voice-state`.
pub async fn voice_state_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(event): Json<VoiceStateEvent>,
) -> Result<Json<ActionList>, ApiError> {
    if event.old_channel.is_none() && event.new_channel.is_none() {
        return Err(ApiError::BadRequest(
            "voice-state event names neither an old nor a new channel".to_string(),
        ));
    }
    let now = chrono::Local::now().time();
    Ok(Json(state.bot.handle_voice_state(&event, now).into()))
}

/// Handler for `POST /events/message`.
pub async fn message_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(event): Json<MessageEvent>,
) -> Result<Json<ActionList>, ApiError> {
    let len = event.content.chars().count();
    if len > MAX_MESSAGE_CHARS {
        return Err(ApiError::BadRequest(format!(
            "message content too long: {len} > {MAX_MESSAGE_CHARS}"
        )));
    }
    Ok(Json(state.bot.handle_message(&event).into()))
}

/// Handler for `POST /events/member-join`.
pub async fn member_join_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(event): Json<MemberJoinEvent>,
) -> Json<ActionList> {
    Json(state.bot.handle_member_join(&event).into())
}

/// Handler for `POST /events/ready`.
pub async fn ready_handler(Extension(state): Extension<Arc<AppState>>) -> Json<ActionList> {
    tracing::info!("platform session ready");
    Json(state.bot.handle_ready().into())
}
