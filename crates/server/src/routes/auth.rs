use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use tracing::{info, warn};

use service::auth::domain::{LoginInput, ResetPasswordInput};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutput {
    pub username: String,
    pub token: String,
    pub expires_at: i64,
}

#[utoipa::path(post, path = "/api/admin/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = state.auth.login(input).await?;

    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let jar = jar.add(cookie);

    let out = LoginOutput { username: session.username, token: session.token, expires_at: session.expires_at };
    Ok((jar, Json(out)))
}

#[utoipa::path(post, path = "/api/admin/reset-password", tag = "auth", request_body = crate::openapi::ResetPasswordRequest, responses((status = 204, description = "Password Changed"), (status = 400, description = "Validation Error"), (status = 401, description = "Unauthorized")))]
pub async fn reset_password(
    State(state): State<ServerState>,
    Json(input): Json<ResetPasswordInput>,
) -> Result<StatusCode, JsonApiError> {
    state.auth.reset_password(input).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn is_public(path: &str, method: &Method) -> bool {
    method == Method::OPTIONS
        || path == "/health"
        || path == "/metrics"
        || path == "/api/admin/login"
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
}

/// Bearer token from the `Authorization` header, falling back to the `auth_token` cookie.
fn extract_token(req: &Request) -> Result<Option<String>, JsonApiError> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return match h.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(Some(t.trim().to_string())),
            _ => Err(JsonApiError::unauthorized("invalid Authorization format (expect Bearer)")),
        };
    }

    Ok(CookieJar::from_headers(req.headers())
        .get(AUTH_COOKIE)
        .map(|c| c.value().trim().to_string())
        .filter(|t| !t.is_empty()))
}

/// Global middleware: everything except probes, docs, login and CORS
/// preflight needs a valid admin token.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    if is_public(&path, req.method()) {
        return Ok(next.run(req).await);
    }

    let Some(token) = extract_token(&req)? else {
        warn!(%path, "missing Authorization header and auth_token cookie");
        return Err(JsonApiError::unauthorized("missing bearer token"));
    };

    match state.auth.verify_token(&token) {
        Ok(claims) => {
            info!(%path, admin = %claims.sub, "authorized request");
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!(%path, err = %e, "token validation failed");
            Err(JsonApiError::unauthorized("invalid or expired token"))
        }
    }
}
