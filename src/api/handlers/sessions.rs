//! Session handlers: login and token refresh.

use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::SESSION_TAG;
use crate::api::dto::{ErrorResponse, LoginRequest, RefreshTokenRequest, SessionResponse};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates session routes.
///
/// # Routes
/// - `POST /api/sessions` - Log in
/// - `POST /api/sessions/refresh` - Exchange a refresh token
pub fn session_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(login))
        .routes(routes!(refresh))
}

/// POST /api/sessions - Log in with email and password
#[utoipa::path(
    post,
    path = "/api/sessions",
    tag = SESSION_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<SessionResponse>> {
    let session = state
        .services
        .sessions
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(session.into()))
}

/// POST /api/sessions/refresh - Issue a new token pair
#[utoipa::path(
    post,
    path = "/api/sessions/refresh",
    tag = SESSION_TAG,
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = SessionResponse),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse)
    )
)]
async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshTokenRequest>,
) -> AppResult<Json<SessionResponse>> {
    let session = state.services.sessions.refresh(&payload.refresh_token).await?;
    Ok(Json(session.into()))
}
