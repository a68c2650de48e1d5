//! Auth routes — registration, login, and the bearer-token extractor.

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use axum::Json;
use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::response::{IntoResponse, Response};

use shared::{AuthResponse, LoginRequest, RegisterRequest, User};

use crate::services::auth::{self as auth_svc, AuthError};
use crate::services::session::{self, SESSION_TTL_SECS};
use crate::state::AppState;

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub(crate) fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the `Authorization` header.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: session::SessionUser,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, token)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { user, token: token.to_owned() })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn issue_session(pool: &sqlx::PgPool, user: User) -> Response {
    match session::create_session(pool, user.id).await {
        Ok(token) => {
            Json(AuthResponse { token, user, expires_in: SESSION_TTL_SECS }).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "session creation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to create session").into_response()
        }
    }
}

/// `POST /api/auth/register` — create an account and log it in.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Response {
    match auth_svc::register(&state.pool, &payload.email, &payload.password, &payload.name).await {
        Ok(user) => issue_session(&state.pool, user).await,
        Err(AuthError::EmailTaken) => {
            (StatusCode::CONFLICT, "email already registered").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "registration failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "registration failed").into_response()
        }
    }
}

/// `POST /api/auth/login` — authenticate and mint a bearer token.
pub async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> Response {
    match auth_svc::login(&state.pool, &payload.email, &payload.password).await {
        Ok(user) => issue_session(&state.pool, user).await,
        Err(AuthError::InvalidCredentials) => {
            (StatusCode::UNAUTHORIZED, "invalid email or password").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "login failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "login failed").into_response()
        }
    }
}

/// `POST /api/auth/logout` — invalidate the presented token.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> StatusCode {
    let _ = session::delete_session(&state.pool, &auth.token).await;
    StatusCode::NO_CONTENT
}

/// `GET /api/auth/me` — return the current user's full record.
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> Response {
    match auth_svc::get_user(&state.pool, auth.user.id).await {
        Ok(Some(user)) => Json(user).into_response(),
        // Session outlived the account; treat the token as dead.
        Ok(None) => StatusCode::UNAUTHORIZED.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "user lookup failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "user lookup failed").into_response()
        }
    }
}
