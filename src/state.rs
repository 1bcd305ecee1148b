//! Application state for Axum web framework.

use std::sync::Arc;

use jiff::tz::TimeZone;

use crate::clock::{Clock, SystemClock};
use crate::config::JwtConfig;
use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since both Services and AsyncDbPool use Arc internally.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Connection pool used by the health checks; `None` for in-memory state
    pub db_pool: Option<AsyncDbPool>,
    /// JWT configuration for token validation
    pub jwt_config: JwtConfig,
}

impl AppState {
    /// PostgreSQL-backed state using the system clock.
    ///
    /// # Arguments
    /// * `pool` - The async database connection pool
    /// * `jwt_config` - JWT configuration for authentication
    /// * `time_zone` - Timezone for meetup hour truncation and day filters
    pub fn new(pool: AsyncDbPool, jwt_config: JwtConfig, time_zone: TimeZone) -> Self {
        let repos = Repositories::postgres(pool.clone());
        let services = Services::new(repos, Arc::new(SystemClock), time_zone, jwt_config.clone());
        Self {
            services,
            db_pool: Some(pool),
            jwt_config,
        }
    }

    /// State backed by empty in-memory repositories.
    pub fn in_memory(jwt_config: JwtConfig, clock: Arc<dyn Clock>, time_zone: TimeZone) -> Self {
        let services = Services::new(
            Repositories::in_memory(),
            clock,
            time_zone,
            jwt_config.clone(),
        );
        Self {
            services,
            db_pool: None,
            jwt_config,
        }
    }
}
