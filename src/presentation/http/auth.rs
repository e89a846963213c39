use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::ports::user_repository::UserRow;
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::logout::Logout as LogoutUc;
use crate::application::use_cases::auth::me::GetMe;
use crate::application::use_cases::auth::session::StartSession;
use crate::bootstrap::app_context::AppContext;

use super::error::{self, ApiError};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/auth/login", tag = "Auth", request_body = LoginRequest, security(()), responses(
    (status = 200, body = UserResponse),
    (status = 401, description = "Invalid credentials")
))]
pub async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<UserResponse>), ApiError> {
    let users = ctx.user_repo();
    let uc = LoginUc {
        repo: users.as_ref(),
    };
    let dto = LoginDto {
        email: req.email.clone(),
        password: req.password.clone(),
    };
    let user = uc
        .execute(&dto)
        .await
        .map_err(error::internal)?
        .ok_or_else(error::unauthorized)?;

    let sessions = ctx.session_repo();
    let issued = StartSession {
        repo: sessions.as_ref(),
    }
    .execute(user.id, ctx.cfg.session_expires_secs)
    .await
    .map_err(error::internal)?;

    // Hand the session back as an HttpOnly cookie
    let mut headers = HeaderMap::new();
    let cookie = build_session_cookie(
        &issued.token,
        ctx.cfg.session_expires_secs,
        cookie_secure(&ctx),
    );
    headers.insert(
        axum::http::header::SET_COOKIE,
        axum::http::HeaderValue::from_str(&cookie)
            .unwrap_or(axum::http::HeaderValue::from_static("")),
    );

    Ok((
        headers,
        Json(UserResponse {
            id: user.id,
            email: user.email,
        }),
    ))
}

#[utoipa::path(get, path = "/api/auth/me", tag = "Auth", responses(
    (status = 200, body = UserResponse),
    (status = 401, description = "No live session")
))]
pub async fn me(
    State(ctx): State<AppContext>,
    token: Result<SessionToken, ApiError>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = require_user(&ctx, &token?).await?;
    Ok(Json(UserResponse {
        id: user.id,
        email: user.email,
    }))
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "Auth", security(()), responses(
    (status = 200, description = "Session revoked and cookie cleared")
))]
pub async fn logout(
    State(ctx): State<AppContext>,
    token: Option<SessionToken>,
) -> Result<(HeaderMap, Json<serde_json::Value>), ApiError> {
    // Revoke the server-side session before clearing the cookie
    if let Some(SessionToken(token)) = token {
        let sessions = ctx.session_repo();
        let uc = LogoutUc {
            repo: sessions.as_ref(),
        };
        uc.execute(&token).await.map_err(error::internal)?;
    }

    let mut headers = HeaderMap::new();
    let cookie = if cookie_secure(&ctx) {
        "session_token=; HttpOnly; Secure; Path=/; Max-Age=0; SameSite=Lax"
    } else {
        "session_token=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax"
    };
    headers.insert(
        axum::http::header::SET_COOKIE,
        axum::http::HeaderValue::from_str(cookie)
            .unwrap_or(axum::http::HeaderValue::from_static("")),
    );
    Ok((
        headers,
        Json(serde_json::json!({ "message": "Logged out successfully" })),
    ))
}

// --- Session token extractor ---
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Opaque session token as presented by the client. Resolution against the
/// session store happens in `require_user`.
pub struct SessionToken(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // 1) Prefer Authorization header if present
        if let Some(auth) = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(t) = auth.strip_prefix("Bearer ") {
                return Ok(SessionToken(t.to_string()));
            }
        }

        // 2) Fallback to HttpOnly cookie `session_token`
        if let Some(cookie_hdr) = parts
            .headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(token) = get_cookie(cookie_hdr, "session_token") {
                return Ok(SessionToken(token));
            }
        }

        Err(error::unauthorized())
    }
}

/// Resolves the presented token to its user or rejects with 401.
pub(crate) async fn require_user(
    ctx: &AppContext,
    token: &SessionToken,
) -> Result<UserRow, ApiError> {
    let sessions = ctx.session_repo();
    let uc = GetMe {
        repo: sessions.as_ref(),
    };
    uc.execute(&token.0)
        .await
        .map_err(error::internal)?
        .ok_or_else(error::unauthorized)
}

// --- Cookie helpers ---

pub(crate) fn cookie_secure(ctx: &AppContext) -> bool {
    ctx.cfg
        .frontend_url
        .as_deref()
        .map(|u| u.starts_with("https://"))
        .unwrap_or(false)
}

fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    for part in cookie_header.split(';') {
        let kv = part.trim();
        if let Some((k, v)) = kv.split_once('=') {
            if k.trim() == name {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}

fn build_session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    // Note: SameSite=Lax for typical same-site SPA/API setups.
    // In cross-site deployments, consider SameSite=None; Secure and CSRF protection.
    let secure_attr = if secure { "; Secure" } else { "" };
    format!(
        "session_token={}; HttpOnly{}; Path=/; Max-Age={}; SameSite=Lax",
        token,
        secure_attr,
        max_age_secs.max(0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_session_cookie_among_others() {
        let header = "theme=dark; session_token=abc123; locale=en";
        assert_eq!(get_cookie(header, "session_token").as_deref(), Some("abc123"));
        assert_eq!(get_cookie(header, "missing"), None);
    }

    #[test]
    fn session_cookie_is_http_only_and_scoped_to_root() {
        let cookie = build_session_cookie("tok", 86400, false);
        assert_eq!(
            cookie,
            "session_token=tok; HttpOnly; Path=/; Max-Age=86400; SameSite=Lax"
        );
        let secure = build_session_cookie("tok", 86400, true);
        assert!(secure.contains("; Secure"));
    }
}
