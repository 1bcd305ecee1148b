use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Token type enumeration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived token sent with every API call
    Access,
    /// Long-lived token exchanged for a new pair
    Refresh,
}

/// JWT claims carrying the authenticated user
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    pub name: String,
    pub token_type: TokenType,
    /// Issued at, seconds since the Unix epoch
    pub iat: i64,
    /// Expiration, seconds since the Unix epoch
    pub exp: i64,
}

/// The user a token is issued for
#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub user_id: i32,
    pub email: String,
    pub name: String,
}

/// An access/refresh token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl Claims {
    pub fn new(
        subject: &TokenSubject,
        token_type: TokenType,
        issued_at: Timestamp,
        expiration_hours: i64,
    ) -> Self {
        let exp = issued_at
            .saturating_add(SignedDuration::from_hours(expiration_hours))
            .unwrap_or(Timestamp::MAX);

        Self {
            sub: subject.user_id.to_string(),
            email: subject.email.clone(),
            name: subject.name.clone(),
            token_type,
            iat: issued_at.as_second(),
            exp: exp.as_second(),
        }
    }

    /// Parses the subject back into a user id.
    pub fn user_id(&self) -> AppResult<i32> {
        self.sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid token subject"))
    }
}

/// Signs a token of `token_type` for `subject`.
pub fn generate_token(
    subject: &TokenSubject,
    token_type: TokenType,
    secret: &str,
    expiration_hours: i64,
) -> AppResult<String> {
    let claims = Claims::new(subject, token_type, Timestamp::now(), expiration_hours);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

/// Signs an access/refresh pair with the lifetimes from `config`.
pub fn generate_token_pair(subject: &TokenSubject, config: &JwtConfig) -> AppResult<TokenPair> {
    let access_token = generate_token(
        subject,
        TokenType::Access,
        &config.secret,
        config.access_token_expiration,
    )?;
    let refresh_token = generate_token(
        subject,
        TokenType::Refresh,
        &config.secret,
        config.refresh_token_expiration,
    )?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        expires_in: config.access_token_expiration * 3600,
    })
}

/// Verifies signature and expiry, and the token type when one is expected.
pub fn validate_token(
    token: &str,
    secret: &str,
    expected_type: Option<TokenType>,
) -> AppResult<Claims> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::unauthorized("Token has expired"),
        ErrorKind::InvalidToken => AppError::unauthorized("Invalid token"),
        ErrorKind::InvalidSignature => AppError::unauthorized("Invalid token signature"),
        _ => AppError::unauthorized(format!("Token validation failed: {}", e)),
    })?;

    if let Some(expected) = expected_type {
        if claims.token_type != expected {
            return Err(AppError::unauthorized(format!(
                "Invalid token type: expected {:?}, got {:?}",
                expected, claims.token_type
            )));
        }
    }

    Ok(claims)
}

pub fn validate_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, Some(TokenType::Access))
}

pub fn validate_refresh_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, Some(TokenType::Refresh))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test_secret_key_for_jwt_testing_0123";

    fn subject() -> TokenSubject {
        TokenSubject {
            user_id: 7,
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
        }
    }

    fn config() -> JwtConfig {
        JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expiration: 1,
            refresh_token_expiration: 168,
        }
    }

    #[test]
    fn test_claims_expiration() {
        let issued_at: Timestamp = "2025-01-01T00:00:00Z".parse().unwrap();
        let claims = Claims::new(&subject(), TokenType::Access, issued_at, 2);
        assert_eq!(claims.exp - claims.iat, 7200);
        assert_eq!(claims.user_id().unwrap(), 7);
    }

    #[test]
    fn test_token_pair_round_trip() {
        let pair = generate_token_pair(&subject(), &config()).unwrap();
        assert_ne!(pair.access_token, pair.refresh_token);
        assert_eq!(pair.expires_in, 3600);

        let access = validate_access_token(&pair.access_token, TEST_SECRET).unwrap();
        assert_eq!(access.sub, "7");
        assert_eq!(access.email, "ada@example.com");
        assert_eq!(access.name, "Ada");

        let refresh = validate_refresh_token(&pair.refresh_token, TEST_SECRET).unwrap();
        assert_eq!(refresh.token_type, TokenType::Refresh);
    }

    #[test]
    fn test_wrong_token_type_is_rejected() {
        let pair = generate_token_pair(&subject(), &config()).unwrap();

        match validate_refresh_token(&pair.access_token, TEST_SECRET) {
            Err(AppError::Unauthorized { message }) => {
                assert!(message.contains("Invalid token type"))
            }
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = generate_token(&subject(), TokenType::Access, TEST_SECRET, 1).unwrap();
        let result = validate_token(&token, "another_secret_key_that_is_long_enough", None);
        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let issued_at: Timestamp = "2020-01-01T00:00:00Z".parse().unwrap();
        let claims = Claims::new(&subject(), TokenType::Access, issued_at, 1);
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        match validate_access_token(&token, TEST_SECRET) {
            Err(AppError::Unauthorized { message }) => assert_eq!(message, "Token has expired"),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_subject() {
        let mut claims = Claims::new(&subject(), TokenType::Access, Timestamp::now(), 1);
        claims.sub = "not-a-number".to_string();
        assert!(matches!(claims.user_id(), Err(AppError::Unauthorized { .. })));
    }
}
