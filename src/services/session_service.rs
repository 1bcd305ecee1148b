//! Session service: login and token refresh.

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::services::UserService;
use crate::utils::jwt::{TokenPair, TokenSubject, generate_token_pair, validate_refresh_token};

/// An authenticated user with a freshly issued token pair.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub tokens: TokenPair,
}

#[derive(Clone)]
pub struct SessionService {
    users: UserService,
    jwt_config: JwtConfig,
}

impl SessionService {
    pub fn new(users: UserService, jwt_config: JwtConfig) -> Self {
        Self { users, jwt_config }
    }

    /// Checks credentials and issues an access/refresh pair.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Session> {
        let user = self.users.authenticate(email, password).await?;
        let tokens = generate_token_pair(&Self::subject(&user), &self.jwt_config)?;

        tracing::info!(user_id = user.id, "Session created");
        Ok(Session { user, tokens })
    }

    /// Exchanges a valid refresh token for a new pair.
    ///
    /// The user must still exist; the new claims carry their current
    /// name and email.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<Session> {
        let claims = validate_refresh_token(refresh_token, &self.jwt_config.secret)?;
        let user = self
            .users
            .get_user(claims.user_id()?)
            .await
            .map_err(|_| AppError::unauthorized("User no longer exists"))?;
        let tokens = generate_token_pair(&Self::subject(&user), &self.jwt_config)?;

        Ok(Session { user, tokens })
    }

    fn subject(user: &User) -> TokenSubject {
        TokenSubject {
            user_id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}
