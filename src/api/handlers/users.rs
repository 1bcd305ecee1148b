//! User signup and profile handlers.

use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::auth::AuthUser;
use crate::api::doc::USER_TAG;
use crate::api::dto::{ErrorResponse, SignupRequest, UpdateProfileRequest, UserResponse};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates user routes.
///
/// # Routes
/// - `POST /api/users` - Sign up
/// - `PUT /api/users` - Update the authenticated user
pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(signup, update_profile))
}

/// POST /api/users - Sign up
#[utoipa::path(
    post,
    path = "/api/users",
    tag = USER_TAG,
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state.services.users.signup(payload.into_signup()).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /api/users - Update the authenticated user's profile
#[utoipa::path(
    put,
    path = "/api/users",
    tag = USER_TAG,
    request_body = UpdateProfileRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 401, description = "Not authenticated or wrong password", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .users
        .update_profile(auth.user_id, payload.into_profile_update())
        .await?;
    Ok(Json(user.into()))
}
