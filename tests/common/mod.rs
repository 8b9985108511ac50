#![allow(dead_code)]

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    test,
};
use chrono::Duration;
use jsonwebtoken::Algorithm;
use serde_json::json;
use tasktrack::auth::{LoginResponse, PasswordHasher, SessionManager, TokenCodec};
use tasktrack::db;
use tasktrack::store::{TaskStore, UserStore};
use tasktrack::AppState;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// Everything a test needs: the app state plus direct handles for setting up
/// situations the HTTP surface cannot produce.
pub struct TestContext {
    pub state: AppState,
    pub users: UserStore,
    pub codec: TokenCodec,
}

pub async fn test_context() -> TestContext {
    let pool = db::connect_memory()
        .await
        .expect("Failed to open in-memory database");
    db::init_schema(&pool).await.expect("Failed to create schema");

    let sessions = SessionManager::new(
        TokenCodec::new(TEST_SECRET, Algorithm::HS256),
        PasswordHasher::new(4),
        UserStore::new(pool.clone()),
        Duration::minutes(30),
        Duration::days(7),
    )
    .expect("Failed to build session manager");

    TestContext {
        state: AppState::new(sessions, TaskStore::new(pool.clone())),
        users: UserStore::new(pool),
        codec: TokenCodec::new(TEST_SECRET, Algorithm::HS256),
    }
}

pub fn register_request(username: &str, password: &str) -> Request {
    test::TestRequest::post()
        .uri("/register")
        .set_json(json!({ "username": username, "password": password }))
        .to_request()
}

pub fn login_request(username: &str, password: &str) -> Request {
    test::TestRequest::post()
        .uri("/login")
        .set_form([("username", username), ("password", password)])
        .to_request()
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub async fn register<S, B>(app: &S, username: &str, password: &str) -> StatusCode
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    test::call_service(app, register_request(username, password))
        .await
        .status()
}

/// Registers and logs in, returning the issued tokens.
pub async fn register_and_login<S, B>(app: &S, username: &str, password: &str) -> LoginResponse
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let status = register(app, username, password).await;
    assert_eq!(status, StatusCode::CREATED, "Failed to register {}", username);

    let resp = test::call_service(app, login_request(username, password)).await;
    assert_eq!(resp.status(), StatusCode::OK, "Failed to log in {}", username);
    test::read_body_json(resp).await
}
