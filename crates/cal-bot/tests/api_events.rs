use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use cal_bot::{app, config::Config, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn setup_app() -> Router {
    let mut config = Config::default();
    config.bot.voice_guilds = vec![1];
    config.bot.log_guild = Some(1);
    config.bot.vc_log_channel = Some(100);
    config.bot.ready_channel = Some(101);
    config.bot.command_channels = vec!["bot".to_string()];
    config.bot.speech_channels = vec!["読み上げ".to_string()];
    config.bot.roles.streaming = Some(10);
    app(AppState::new(config))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn message_body(channel_name: &str, content: &str) -> Value {
    json!({
        "guild_id": 1,
        "channel_id": 300,
        "channel_name": channel_name,
        "message_id": 900,
        "author": { "id": 42, "username": "user42" },
        "content": content
    })
}

#[tokio::test]
async fn health_check_returns_ok() {
    let response = setup_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn voice_state_returns_role_and_log_actions() {
    let (status, json) = post_json(
        setup_app(),
        "/events/voice-state",
        json!({
            "guild_id": 1,
            "member": {
                "id": 42,
                "username": "user42",
                "flags": { "streaming": true },
                "role_ids": []
            },
            "old_channel": { "id": 5, "name": "雑談", "occupants": [{ "username": "user42" }] },
            "new_channel": { "id": 5, "name": "雑談", "occupants": [{ "username": "user42" }] },
            "bot_connections": [{ "id": 5, "name": "雑談" }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let actions = json["actions"].as_array().unwrap();
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0]["type"], "add_role");
    assert_eq!(actions[0]["role_id"], 10);
    assert_eq!(actions[1]["type"], "send_message");
    assert_eq!(actions[1]["channel_id"], 100);
    assert!(actions[1]["content"]
        .as_str()
        .unwrap()
        .ends_with("`user42` が画面共有を開始しました"));
}

#[tokio::test]
async fn voice_state_without_channels_is_rejected() {
    let (status, json) = post_json(
        setup_app(),
        "/events/voice-state",
        json!({ "guild_id": 1 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("neither"));
}

#[tokio::test]
async fn message_speaks_in_speech_channel() {
    let (status, json) = post_json(
        setup_app(),
        "/events/message",
        message_body("読み上げ", "en hello world"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let action = &json["actions"][0];
    assert_eq!(action["type"], "speak");
    assert_eq!(action["text"], "hello world");
    assert_eq!(action["language"], "english");
    assert!(action["url"].as_str().unwrap().contains("tl=en-US"));
}

#[tokio::test]
async fn message_command_replies() {
    let (status, json) = post_json(setup_app(), "/events/message", message_body("bot", "/cal")).await;

    assert_eq!(status, StatusCode::OK);
    let action = &json["actions"][0];
    assert_eq!(action["type"], "reply");
    assert_eq!(action["message_id"], 900);
}

#[tokio::test]
async fn oversized_message_is_rejected() {
    let content = "あ".repeat(cal_bot::api::MAX_MESSAGE_CHARS + 1);
    let (status, _) = post_json(
        setup_app(),
        "/events/message",
        message_body("読み上げ", &content),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_event_is_a_client_error() {
    let (status, _) = post_json(
        setup_app(),
        "/events/message",
        json!({ "guild_id": "not a number" }),
    )
    .await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn ready_posts_startup_notice() {
    let response = setup_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/events/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["actions"][0]["channel_id"], 101);
    assert_eq!(json["actions"][0]["content"], "キャルの参上よ！");
}

#[tokio::test]
async fn member_join_outside_welcome_guild_is_silent() {
    let (status, json) = post_json(
        setup_app(),
        "/events/member-join",
        json!({ "guild_id": 1, "guild_name": "ギルド", "user_id": 7 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["actions"], json!([]));
}
