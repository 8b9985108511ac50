use crate::{
    auth::{
        AuthenticatedUserId, LoginForm, LoginResponse, RefreshRequest, RefreshResponse,
        RegisterRequest, SessionManager,
    },
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Register a new user
///
/// Creates the account and answers `201`. A taken username is `400`.
#[post("/register")]
pub async fn register(
    sessions: web::Data<SessionManager>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    sessions
        .register(&register_data.username, &register_data.password)
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully"
    })))
}

/// Login user
///
/// Takes form-encoded `username` and `password` and returns an access and a
/// refresh token.
#[post("/login")]
pub async fn login(
    sessions: web::Data<SessionManager>,
    form: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    let pair = sessions.login(&form.username, &form.password).await?;
    Ok(HttpResponse::Ok().json(LoginResponse::from(pair)))
}

/// Exchange a refresh token for a new access token.
#[post("/refresh")]
pub async fn refresh(
    sessions: web::Data<SessionManager>,
    body: web::Json<RefreshRequest>,
) -> Result<impl Responder, AppError> {
    let access_token = sessions
        .refresh(&body.refresh_token)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Unauthorized(_) => AppError::Unauthorized("Invalid refresh token".into()),
            other => other,
        })?;

    Ok(HttpResponse::Ok().json(RefreshResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// Greets the authenticated user. A token for a user that no longer exists
/// is treated as invalid.
pub async fn protected(
    sessions: web::Data<SessionManager>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let user = sessions.current_user(user_id.0).await?.ok_or_else(|| {
        log::warn!("valid token for missing user id {}", user_id.0);
        AppError::Unauthorized("Invalid token".into())
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Welcome, {}!", user.username)
    })))
}
