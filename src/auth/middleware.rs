use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderValue},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::{AuthenticatedUserId, SessionManager};
use crate::error::AppError;

/// Rejects requests without a valid bearer access token for an existing user.
///
/// Wrap only the resources and scopes that need protection; everything else
/// stays public.
#[derive(Clone)]
pub struct AuthMiddleware {
    sessions: web::Data<SessionManager>,
}

impl AuthMiddleware {
    pub fn new(sessions: web::Data<SessionManager>) -> Self {
        Self { sessions }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            sessions: self.sessions.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    sessions: web::Data<SessionManager>,
}

/// The credentials of an `Authorization: Bearer <token>` header. The scheme
/// is matched case-insensitively.
fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let sessions = self.sessions.clone();

        Box::pin(async move {
            let verified = match bearer_token(&req) {
                Some(token) => sessions.authenticate(&token).await.map_err(AppError::from),
                None => {
                    log::warn!("rejecting {} {}: missing bearer token", req.method(), req.path());
                    Err(AppError::Unauthorized("Not authenticated".into()))
                }
            };

            match verified {
                Ok(user_id) => {
                    req.extensions_mut().insert(AuthenticatedUserId(user_id));
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(app_err) => {
                    // Short-circuit: the inner service is never called.
                    let mut response = req.error_response(app_err);
                    response
                        .headers_mut()
                        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                    Ok(response.map_into_right_body())
                }
            }
        })
    }
}
