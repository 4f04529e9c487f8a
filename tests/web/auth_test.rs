//! `/dashboardauth` routing: login redirect, code exchange, state redirects, cluster forwarding and
//! waiting for invited guilds.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use loritta_dashboard::{
    internal::{
        db,
        discord::DISCORD_CRAWLER_USER_AGENT,
        model::{daily, profile},
        session::SESSION_COOKIE,
        web::auth::decode_state_redirect,
    },
    utils::test::{CapturedLogs, FakeOAuth, TEST_HOST, test_config},
};
use sea_orm::{ActiveValue::Set, EntityTrait};

use super::{LOCAL_GUILD, REMOTE_GUILD, TestApp, body_text, get, location};

fn encoded_state(redirect_url: &str) -> String {
    let state = serde_json::json!({ "redirectUrl": redirect_url }).to_string();
    url::form_urlencoded::byte_serialize(STANDARD.encode(state).as_bytes()).collect()
}

#[tokio::test]
async fn test_without_code_redirects_to_discord() {
    let app = TestApp::new(&[]).await;
    let response = app.send(get("/dashboardauth")).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = location(&response);
    let (authorize, state) = location.split_once("&state=").unwrap();
    assert_eq!(
        authorize,
        "https://discord.com/oauth2/authorize?client_id=1&response_type=code"
    );
    let state: String = url::form_urlencoded::parse(format!("s={state}").as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap();
    assert_eq!(
        decode_state_redirect(&state).unwrap().as_deref(),
        Some("https://loritta.test/dashboardauth")
    );
    assert!(app.oauth.exchanged_codes().is_empty());
}

#[tokio::test]
async fn test_discord_crawler_gets_a_page() {
    let app = TestApp::new(&[]).await;
    let request = Request::get("/dashboardauth")
        .header(header::HOST, TEST_HOST)
        .header(header::USER_AGENT, DISCORD_CRAWLER_USER_AGENT)
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("<title>Loritta Dashboard</title>"));
}

#[tokio::test]
async fn test_logged_in_without_code_goes_to_dashboard() {
    let app = TestApp::new(&[]).await;
    let cookie = app.login().await;
    let request = Request::get("/dashboardauth")
        .header(header::HOST, TEST_HOST)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "https://loritta.test/dashboard");
}

#[tokio::test]
async fn test_code_exchange_sets_session_cookie() {
    let app = TestApp::new(&[]).await;
    let response = app.send(get("/dashboardauth?code=abc")).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "https://loritta.test/dashboard");
    assert_eq!(
        app.oauth.exchanged_codes(),
        vec![(
            "abc".to_string(),
            "https://loritta.test/dashboardauth".to_string()
        )]
    );

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap();
    let id = cookie
        .strip_prefix(&format!("{SESSION_COOKIE}="))
        .and_then(|rest| rest.split(';').next())
        .unwrap();
    let session = app.state.sessions.get(&id.parse().unwrap()).await.unwrap();
    assert_eq!(session.identification, Some(FakeOAuth::user()));
    assert_eq!(session.discord_auth.unwrap().access_token, "token-abc");
}

#[tokio::test]
async fn test_failed_exchange_is_a_server_error() {
    let app = TestApp::new(&[]).await;
    let response = app.send(get("/dashboardauth?code=invalid")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert!(!body_text(response).await.contains("invalid_grant"));
}

#[tokio::test]
async fn test_logins_stay_within_session_capacity() {
    let mut config = test_config();
    config.website.max_sessions = 16;
    let app = TestApp::with_config(config, &[]).await;

    for i in 0..40 {
        let response = app.send(get(&format!("/dashboardauth?code=c{i}"))).await;
        assert_eq!(response.status(), StatusCode::FOUND);
    }
    assert_eq!(app.state.sessions.len().await, 16);
}

#[tokio::test]
async fn test_state_redirect() {
    let app = TestApp::new(&[LOCAL_GUILD]).await;
    let state = encoded_state("https://loritta.test/dashboard/configure/42");
    let response = app
        .send(get(&format!(
            "/dashboardauth?code=abc&guild_id={LOCAL_GUILD}&state={state}"
        )))
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        "https://loritta.test/dashboard/configure/42"
    );
    assert_eq!(app.guilds.lookups(), 0);
}

#[tokio::test]
async fn test_state_redirect_with_port() {
    let app = TestApp::new(&[]).await;
    let state = encoded_state("https://loritta.test:8443/dashboard/configure/42");
    let request = Request::get(format!("/dashboardauth?code=abc&state={state}"))
        .header(header::HOST, "loritta.test:8443")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        "https://loritta.test:8443/dashboard/configure/42"
    );
}

#[tokio::test]
async fn test_untrusted_state_redirect_is_ignored() {
    let app = TestApp::new(&[]).await;
    let state = encoded_state("https://evil.example.com/phish");
    let response = app
        .send(get(&format!("/dashboardauth?code=abc&state={state}")))
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "https://loritta.test/dashboard");
}

#[tokio::test]
async fn test_malformed_state_is_rejected() {
    let app = TestApp::new(&[]).await;
    let response = app
        .send(get("/dashboardauth?code=abc&state=not-base64!"))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_guild_id_is_rejected() {
    let app = TestApp::new(&[]).await;
    let response = app
        .send(get("/dashboardauth?code=abc&guild_id=loritta"))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_guild_on_another_cluster_is_forwarded() {
    let app = TestApp::new(&[REMOTE_GUILD]).await;
    let response = app
        .send(get(&format!("/dashboardauth?code=abc&guild_id={REMOTE_GUILD}")))
        .await;

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        location(&response),
        format!("https://c2.loritta.test/dashboard?guild_id={REMOTE_GUILD}&code=from_master")
    );
    assert_eq!(app.guilds.lookups(), 0);
}

#[tokio::test]
async fn test_from_master_skips_cluster_check() {
    let app = TestApp::new(&[REMOTE_GUILD]).await;
    let response = app
        .send(get(&format!(
            "/dashboardauth?code=abc&guild_id={REMOTE_GUILD}&from_master=true"
        )))
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        format!("https://loritta.test/dashboard/configure/{REMOTE_GUILD}")
    );
}

#[tokio::test]
async fn test_forwarded_login_reuses_identification() {
    let app = TestApp::new(&[LOCAL_GUILD]).await;
    let cookie = app.login().await;
    let request = Request::get(format!(
        "/dashboardauth?code=from_master&guild_id={LOCAL_GUILD}"
    ))
    .header(header::HOST, TEST_HOST)
    .header(header::COOKIE, cookie)
    .body(Body::empty())
    .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        format!("https://loritta.test/dashboard/configure/{LOCAL_GUILD}")
    );
    assert!(app.oauth.exchanged_codes().is_empty());
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_invited_guild_found() {
    let app = TestApp::new(&[LOCAL_GUILD]).await;
    let response = app
        .send(get(&format!("/dashboardauth?code=abc&guild_id={LOCAL_GUILD}")))
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        format!("https://loritta.test/dashboard/configure/{LOCAL_GUILD}")
    );
    assert_eq!(app.guilds.lookups(), 1);
}

#[tokio::test]
async fn test_invited_guild_never_shows_up() {
    let app = TestApp::new(&[]).await;
    let response = app
        .send(get(&format!("/dashboardauth?code=abc&guild_id={LOCAL_GUILD}")))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.guilds.lookups(), 3);
    assert!(body_text(response)
        .await
        .contains(r#"<a href="https://loritta.test/dashboard">"#));
}

#[tokio::test]
async fn test_banned_accounts_do_not_block_login() {
    let app = TestApp::new(&[]).await;
    profile::Entity::insert(profile::ActiveModel {
        id: Set(42),
        is_banned: Set(true),
        banned_reason: Set(Some("alt account".to_string())),
    })
    .exec(&app.state.db)
    .await
    .unwrap();
    daily::Entity::insert(daily::ActiveModel {
        user_id: Set(42),
        ip: Set("203.0.113.7".to_string()),
        received_at: Set(0),
        ..Default::default()
    })
    .exec(&app.state.db)
    .await
    .unwrap();

    let banned = db::banned_profiles_for_ip(&app.state.db, "203.0.113.7")
        .await
        .unwrap();
    assert_eq!(banned.iter().map(|p| p.id).collect::<Vec<_>>(), vec![42]);

    let logs = CapturedLogs::default();
    let _guard = logs.install();
    let request = Request::get("/dashboardauth?code=abc")
        .header(header::HOST, TEST_HOST)
        .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "https://loritta.test/dashboard");
    assert!(logs.contents().contains(&format!(
        "User {} has banned accounts in 203.0.113.7! IDs: 42",
        FakeOAuth::user().id
    )));
}
