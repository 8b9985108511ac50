use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

#[get("/")]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Welcome to the task management system!"
    }))
}

/// Liveness probe for the task service. Public, so load balancers need no token.
///
/// Answers `{"status": "ok", "service": "tasktrack", "version": ..., "timestamp": ...}`
/// with an RFC 3339 UTC timestamp.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now()
    }))
}
