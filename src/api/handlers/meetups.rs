//! Meetup handlers. Every route requires a bearer token.

use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::auth::AuthUser;
use crate::api::doc::MEETUP_TAG;
use crate::api::dto::{
    CancelMeetupResponse, ErrorResponse, MeetupListQuery, MeetupRequest, MeetupResponse,
    PagedResponse,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{JsonBody, PathParam, ValidatedQuery};

/// Creates meetup routes.
///
/// # Routes
/// - `GET /api/meetups` - List, 10 per page, optionally for one day
/// - `POST /api/meetups` - Create
/// - `PUT /api/meetups/{id}` - Update (organizer only, upcoming only)
/// - `DELETE /api/meetups/{id}` - Cancel (organizer only, upcoming only)
pub fn meetup_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_meetups, create_meetup))
        .routes(routes!(update_meetup, cancel_meetup))
}

#[utoipa::path(
    get,
    path = "/api/meetups",
    tag = MEETUP_TAG,
    params(MeetupListQuery),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "One page of meetups", body = PagedResponse<MeetupResponse>),
        (status = 400, description = "Invalid page or date", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
async fn list_meetups(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<MeetupListQuery>,
) -> AppResult<Json<PagedResponse<MeetupResponse>>> {
    let page = state
        .services
        .meetups
        .list(query.date.as_deref(), query.page)
        .await?;

    Ok(Json(PagedResponse::new(
        page.items.into_iter().map(MeetupResponse::from).collect(),
        page.page,
        page.page_size,
        u64::try_from(page.total).unwrap_or_default(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/meetups",
    tag = MEETUP_TAG,
    request_body = MeetupRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Meetup created", body = MeetupResponse),
        (status = 400, description = "Invalid payload or past date", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
async fn create_meetup(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(payload): JsonBody<MeetupRequest>,
) -> AppResult<(StatusCode, Json<MeetupResponse>)> {
    let meetup = state
        .services
        .meetups
        .create(payload.into_input(), auth.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(meetup.into())))
}

#[utoipa::path(
    put,
    path = "/api/meetups/{id}",
    tag = MEETUP_TAG,
    params(("id" = i32, Path, description = "Meetup id")),
    request_body = MeetupRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Meetup updated", body = MeetupResponse),
        (status = 400, description = "Invalid payload, past date or elapsed meetup", body = ErrorResponse),
        (status = 401, description = "Not authenticated or not the organizer", body = ErrorResponse),
        (status = 404, description = "Meetup not found", body = ErrorResponse)
    )
)]
async fn update_meetup(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<MeetupRequest>,
) -> AppResult<Json<MeetupResponse>> {
    let meetup = state
        .services
        .meetups
        .update(id, payload.into_input(), auth.user_id)
        .await?;
    Ok(Json(meetup.into()))
}

#[utoipa::path(
    delete,
    path = "/api/meetups/{id}",
    tag = MEETUP_TAG,
    params(("id" = i32, Path, description = "Meetup id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Meetup cancelled", body = CancelMeetupResponse),
        (status = 400, description = "Meetup already happened", body = ErrorResponse),
        (status = 401, description = "Not authenticated or not the organizer", body = ErrorResponse),
        (status = 404, description = "Meetup not found", body = ErrorResponse)
    )
)]
async fn cancel_meetup(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<CancelMeetupResponse>> {
    let meetup = state.services.meetups.cancel(id, auth.user_id).await?;
    Ok(Json(meetup.into()))
}
