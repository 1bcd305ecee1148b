//! Database module.
//!
//! Async PostgreSQL connection pooling (diesel_async + bb8) and embedded
//! schema migrations.

mod migrations;
mod pool;

pub use migrations::{MIGRATIONS, run_pending_migrations};
pub use pool::{AsyncDbPool, check_connection, establish_async_connection_pool};
pub(crate) use migrations::establish_sync_connection;
