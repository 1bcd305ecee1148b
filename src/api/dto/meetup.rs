//! Meetup DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::Meetup;
use crate::services::MeetupInput;

/// Query parameters for listing meetups.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct MeetupListQuery {
    /// Calendar day (`YYYY-MM-DD`) or timestamp whose day is used
    #[param(example = "2030-01-15")]
    pub date: Option<String>,

    /// Page number (1-based), 10 meetups per page
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    #[param(minimum = 1, example = 1)]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

/// Request body for creating or updating a meetup.
///
/// On create `title`, `description`, `location` and `date` are required; on
/// update every field is optional and `organizer_id` may only repeat the
/// current organizer.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MeetupRequest {
    #[schema(example = "Rust Night")]
    pub title: Option<String>,
    #[schema(example = "Lightning talks and pizza")]
    pub description: Option<String>,
    #[schema(example = "Main Street 10")]
    pub location: Option<String>,
    /// RFC 3339 timestamp; values without an offset use the server timezone
    #[schema(example = "2030-01-15T19:00:00-03:00")]
    pub date: Option<String>,
    /// Must equal the authenticated user (create) or the current organizer
    /// (update) when present
    pub organizer_id: Option<i64>,
    pub banner_id: Option<i64>,
}

impl MeetupRequest {
    pub fn into_input(self) -> MeetupInput {
        MeetupInput {
            title: self.title,
            description: self.description,
            location: self.location,
            date: self.date,
            organizer_id: self.organizer_id,
            banner_id: self.banner_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeetupResponse {
    #[schema(example = 1)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub location: String,
    #[schema(value_type = String, format = DateTime, example = "2030-01-15T22:00:00Z")]
    pub date: String,
    pub organizer_id: i32,
    pub banner_id: Option<i32>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: String,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: String,
}

impl From<Meetup> for MeetupResponse {
    fn from(meetup: Meetup) -> Self {
        Self {
            id: meetup.id,
            title: meetup.title,
            description: meetup.description,
            location: meetup.location,
            date: meetup.date.to_string(),
            organizer_id: meetup.organizer_id,
            banner_id: meetup.banner_id,
            created_at: meetup.created_at.to_string(),
            updated_at: meetup.updated_at.to_string(),
        }
    }
}

/// Confirmation returned by a cancel.
#[derive(Debug, Serialize, ToSchema)]
pub struct CancelMeetupResponse {
    #[schema(example = "Meetup cancelled")]
    pub message: String,
    pub meetup: MeetupResponse,
}

impl From<Meetup> for CancelMeetupResponse {
    fn from(meetup: Meetup) -> Self {
        Self {
            message: "Meetup cancelled".to_string(),
            meetup: meetup.into(),
        }
    }
}
