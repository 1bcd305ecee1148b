//! Service layer for business logic operations.
//!
//! Services encapsulate business rules and coordinate between
//! repositories and handlers. They never touch HTTP types.

mod meetup_service;
mod meetup_validator;
mod session_service;
mod user_service;

pub use meetup_service::{MeetupPage, MeetupService, PAGE_SIZE};
pub use meetup_validator::{MeetupDraft, MeetupInput, MeetupPatch, MeetupValidator};
pub use session_service::{Session, SessionService};
pub use user_service::{ProfileUpdate, Signup, UserService};

use std::sync::Arc;

use jiff::tz::TimeZone;

use crate::clock::Clock;
use crate::config::JwtConfig;
use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub sessions: SessionService,
    pub meetups: MeetupService,
}

impl Services {
    pub fn new(
        repos: Repositories,
        clock: Arc<dyn Clock>,
        time_zone: TimeZone,
        jwt_config: JwtConfig,
    ) -> Self {
        let users = UserService::new(repos.users);
        Self {
            sessions: SessionService::new(users.clone(), jwt_config),
            users,
            meetups: MeetupService::new(repos.meetups, clock, time_zone),
        }
    }
}
