mod common;

use actix_web::{
    http::{header, StatusCode},
    test, App,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tasktrack::auth::{Claims, LoginResponse, RefreshResponse, TokenCodec};
use tasktrack::config::Config;
use tasktrack::routes;

use common::{bearer, login_request, register, register_and_login, register_request, test_context};

fn refresh_request(token: &str) -> actix_http::Request {
    test::TestRequest::post()
        .uri("/refresh")
        .set_json(json!({ "refresh_token": token }))
        .to_request()
}

fn protected_request(token: &str) -> actix_http::Request {
    test::TestRequest::get()
        .uri("/protected")
        .insert_header(bearer(token))
        .to_request()
}

#[actix_rt::test]
async fn test_session_lifecycle() {
    let ctx = test_context().await;
    let app = test::init_service(App::new().configure(routes::config(ctx.state.clone()))).await;

    let tokens = register_and_login(&app, "alice", "secret").await;
    assert_eq!(tokens.token_type, "bearer");
    assert!(!tokens.access_token.is_empty());
    assert!(!tokens.refresh_token.is_empty());

    let resp = test::call_service(&app, protected_request(&tokens.access_token)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Welcome, alice!");

    // Same user, correctly signed, already past its expiry.
    let user = ctx.users.find_by_username("alice").await.unwrap().unwrap();
    let now = TokenCodec::now();
    let expired = ctx
        .codec
        .encode(&Claims {
            sub: Some(user.id.to_string()),
            exp: now - 60,
            iat: now - 120,
            token_type: None,
        })
        .unwrap();
    let resp = test::call_service(&app, protected_request(&expired)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(&app, refresh_request(&tokens.refresh_token)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let refreshed: RefreshResponse = test::read_body_json(resp).await;
    assert_eq!(refreshed.token_type, "bearer");

    let resp = test::call_service(&app, protected_request(&refreshed.access_token)).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_register_duplicate_username() {
    let ctx = test_context().await;
    let app = test::init_service(App::new().configure(routes::config(ctx.state.clone()))).await;

    assert_eq!(register(&app, "bob", "secret").await, StatusCode::CREATED);

    let resp = test::call_service(&app, register_request("bob", "another")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "User already exists" }));
}

#[actix_rt::test]
async fn test_concurrent_registration_creates_one_user() {
    let ctx = test_context().await;
    let app = test::init_service(App::new().configure(routes::config(ctx.state.clone()))).await;

    let (first, second) = futures::future::join(
        test::call_service(&app, register_request("carol", "secret")),
        test::call_service(&app, register_request("carol", "secret")),
    )
    .await;

    let mut statuses = vec![first.status().as_u16(), second.status().as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, vec![201, 400]);
}

#[actix_rt::test]
async fn test_concurrent_registration_on_pooled_database() {
    let path = std::env::temp_dir().join(format!(
        "tasktrack-race-{}-{}.db",
        std::process::id(),
        TokenCodec::now()
    ));
    let config = Config {
        database_url: format!("sqlite://{}?mode=rwc", path.display()),
        database_max_connections: 5,
        server_port: 0,
        server_host: "127.0.0.1".to_string(),
        jwt_secret: "race-secret".to_string(),
        jwt_algorithm: jsonwebtoken::Algorithm::HS256,
        access_token_ttl_minutes: 30,
        refresh_token_ttl_days: 7,
        bcrypt_cost: 4,
    };
    let state = tasktrack::build_state(&config).await.unwrap();
    let app = test::init_service(App::new().configure(routes::config(state))).await;

    for round in 0..5 {
        let username = format!("racer{}", round);
        let attempts = (0..8).map(|_| test::call_service(&app, register_request(&username, "secret")));
        let statuses: Vec<u16> = futures::future::join_all(attempts)
            .await
            .iter()
            .map(|resp| resp.status().as_u16())
            .collect();

        assert_eq!(statuses.iter().filter(|s| **s == 201).count(), 1, "round {}", round);
        assert_eq!(statuses.iter().filter(|s| **s == 400).count(), 7, "round {}", round);
    }

    drop(app);
    let _ = std::fs::remove_file(&path);
}

#[actix_rt::test]
async fn test_login_failures_look_the_same() {
    let ctx = test_context().await;
    let app = test::init_service(App::new().configure(routes::config(ctx.state.clone()))).await;
    assert_eq!(register(&app, "dave", "secret").await, StatusCode::CREATED);

    let unknown = test::call_service(&app, login_request("nobody", "secret")).await;
    let wrong = test::call_service(&app, login_request("dave", "not-it")).await;

    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
    assert_eq!(wrong.status(), StatusCode::BAD_REQUEST);

    let unknown_body: Value = test::read_body_json(unknown).await;
    let wrong_body: Value = test::read_body_json(wrong).await;
    assert_eq!(unknown_body, wrong_body);
    assert_eq!(unknown_body["error"], "Incorrect username or password");
}

#[actix_rt::test]
async fn test_refresh_rejections() {
    let ctx = test_context().await;
    let app = test::init_service(App::new().configure(routes::config(ctx.state.clone()))).await;
    let tokens: LoginResponse = register_and_login(&app, "erin", "secret").await;

    // An access token is validly signed but has the wrong purpose.
    let resp = test::call_service(&app, refresh_request(&tokens.access_token)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid token type");

    let resp = test::call_service(&app, refresh_request("not.a.token")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid refresh token");

    let user = ctx.users.find_by_username("erin").await.unwrap().unwrap();
    assert!(ctx.users.delete(user.id).await.unwrap());

    let resp = test::call_service(&app, refresh_request(&tokens.refresh_token)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "User not found");
}

#[actix_rt::test]
async fn test_protected_rejections() {
    let ctx = test_context().await;
    let app = test::init_service(App::new().configure(routes::config(ctx.state.clone()))).await;
    let tokens = register_and_login(&app, "frank", "secret").await;

    let req = test::TestRequest::get().uri("/protected").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header((header::AUTHORIZATION, format!("BEARER {}", tokens.access_token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let resp = test::call_service(&app, protected_request(&tokens.refresh_token)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let other = TokenCodec::new(b"some-other-secret", jsonwebtoken::Algorithm::HS256);
    let now = TokenCodec::now();
    let forged = other
        .encode(&Claims {
            sub: Some("1".to_string()),
            exp: now + 600,
            iat: now,
            token_type: None,
        })
        .unwrap();
    let resp = test::call_service(&app, protected_request(&forged)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let user = ctx.users.find_by_username("frank").await.unwrap().unwrap();
    assert!(ctx.users.delete(user.id).await.unwrap());
    let resp = test::call_service(&app, protected_request(&tokens.access_token)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_register_input_validation() {
    let ctx = test_context().await;
    let app = test::init_service(App::new().configure(routes::config(ctx.state.clone()))).await;

    let cases = vec![
        (json!({ "username": "ab", "password": "secret" }), StatusCode::UNPROCESSABLE_ENTITY),
        (json!({ "username": "bad name!", "password": "secret" }), StatusCode::UNPROCESSABLE_ENTITY),
        (json!({ "username": "gina", "password": "123" }), StatusCode::UNPROCESSABLE_ENTITY),
        (json!({ "password": "secret" }), StatusCode::BAD_REQUEST),
    ];

    for (payload, expected) in cases {
        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected, "payload: {}", payload);
    }

    let req = test::TestRequest::post()
        .uri("/register")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
