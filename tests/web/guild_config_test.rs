//! Guild configuration API: loading and saving the custom command list.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use loritta_dashboard::{
    internal::custom_command::{
        CustomCommand, client::PartialGuildConfiguration, editor::CustomCommandsEditor,
    },
    utils::test::TEST_HOST,
};

use super::{LOCAL_GUILD, TestApp, body_text, get};

fn config_uri(guild_id: u64) -> String {
    format!("/api/v1/guilds/{guild_id}/config")
}

fn patch(guild_id: u64, cookie: &str, body: &serde_json::Value) -> Request<Body> {
    Request::patch(config_uri(guild_id))
        .header(header::HOST, TEST_HOST)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn retrieve(app: &TestApp, cookie: &str, query: &str) -> PartialGuildConfiguration {
    let request = Request::get(format!("{}{query}", config_uri(LOCAL_GUILD)))
        .header(header::HOST, TEST_HOST)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_str(&body_text(response).await).unwrap()
}

#[tokio::test]
async fn test_requires_login() {
    let app = TestApp::new(&[]).await;
    let response = app.send(get(&config_uri(LOCAL_GUILD))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = serde_json::json!({ "type": "custom_commands", "entries": [] });
    let response = app
        .send(patch(LOCAL_GUILD, "SESSION_ID=unknown", &body))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_save_then_retrieve_editor_commands() {
    let app = TestApp::new(&[]).await;
    let cookie = app.login().await;
    assert!(retrieve(&app, &cookie, "").await.custom_commands.is_empty());

    let mut editor = CustomCommandsEditor::new();
    editor.attach(LOCAL_GUILD, Vec::new());
    editor.add_text_command("hello", "Hello $user!").unwrap();
    editor
        .add_text_command("rules", "1. Be nice\n2. \"\"\"No spam\"\"\"")
        .unwrap();
    let body = serde_json::to_value(editor.save_request().unwrap()).unwrap();

    let response = app.send(patch(LOCAL_GUILD, &cookie, &body)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let config = retrieve(&app, &cookie, "?sections=custom_commands").await;
    assert_eq!(config.custom_commands, editor.commands().unwrap());
    assert_eq!(
        config.custom_commands[1].message_text().unwrap(),
        "1. Be nice\n2. \"\"\"No spam\"\"\""
    );

    let config = retrieve(&app, &cookie, "?sections=general").await;
    assert!(config.custom_commands.is_empty());
}

#[tokio::test]
async fn test_save_replaces_previous_list() {
    let app = TestApp::new(&[]).await;
    let cookie = app.login().await;
    let first = CustomCommand::text("a", "one").unwrap();
    let second = CustomCommand::text("b", "two").unwrap();

    let body = serde_json::json!({ "type": "custom_commands", "entries": [first, second] });
    app.send(patch(LOCAL_GUILD, &cookie, &body)).await;
    let body = serde_json::json!({ "type": "custom_commands", "entries": [second] });
    app.send(patch(LOCAL_GUILD, &cookie, &body)).await;

    let config = retrieve(&app, &cookie, "").await;
    assert_eq!(config.custom_commands, vec![second]);
}

#[tokio::test]
async fn test_rejects_unknown_save_type() {
    let app = TestApp::new(&[]).await;
    let cookie = app.login().await;
    let body = serde_json::json!({ "type": "autorole", "entries": [] });

    let response = app.send(patch(LOCAL_GUILD, &cookie, &body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("autorole"));
}

#[tokio::test]
async fn test_rejects_malformed_entries() {
    let app = TestApp::new(&[]).await;
    let cookie = app.login().await;

    let missing_code = serde_json::json!({ "type": "custom_commands", "entries": [{ "label": "a" }] });
    let response = app.send(patch(LOCAL_GUILD, &cookie, &missing_code)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let empty_label = serde_json::json!({
        "type": "custom_commands",
        "entries": [{ "label": " ", "code": "sendMessage(\"hi\")" }],
    });
    let response = app.send(patch(LOCAL_GUILD, &cookie, &empty_label)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
