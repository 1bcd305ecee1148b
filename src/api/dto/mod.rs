//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `user` - Signup and profile DTOs
//! - `session` - Login and token refresh DTOs
//! - `meetup` - Meetup DTOs
//! - `health` - Health check DTOs
//! - `error` - Common error response DTOs
//! - `pagination` - Pagination-related DTOs

mod error;
mod health;
mod meetup;
mod pagination;
mod session;
mod user;

pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use meetup::{CancelMeetupResponse, MeetupListQuery, MeetupRequest, MeetupResponse};
pub use pagination::{PagedResponse, PaginationMeta};
pub use session::{LoginRequest, RefreshTokenRequest, SessionResponse};
pub use user::{SignupRequest, UpdateProfileRequest, UserResponse};
