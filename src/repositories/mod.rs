//! Repository layer for data access operations.
//!
//! Each repository is an async trait with a PostgreSQL implementation
//! (diesel_async) and an in-memory implementation used by the service and
//! router tests.

mod meetup_repo;
mod memory;
mod user_repo;

pub use meetup_repo::{MeetupRepository, PgMeetupRepository};
pub use memory::{InMemoryMeetupRepository, InMemoryUserRepository};
pub use user_repo::{PgUserRepository, UserRepository};

use std::sync::Arc;

use crate::db::AsyncDbPool;

/// Aggregates all repositories behind trait objects.
///
/// Cloning only bumps reference counts.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub meetups: Arc<dyn MeetupRepository>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one connection pool.
    pub fn postgres(pool: AsyncDbPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            meetups: Arc::new(PgMeetupRepository::new(pool)),
        }
    }

    /// Empty in-memory repositories.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::default()),
            meetups: Arc::new(InMemoryMeetupRepository::default()),
        }
    }
}
