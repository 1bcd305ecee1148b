//! User-related DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::User;
use crate::services::{ProfileUpdate, Signup};

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for signing up.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "You must provide a user name"))]
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[validate(email(message = "The email provided is invalid"))]
    #[schema(example = "jane@example.com", format = "email")]
    pub email: String,
    #[validate(length(min = 6, message = "The password must have at least 6 characters"))]
    #[schema(format = "password", min_length = 6)]
    pub password: String,
}

impl SignupRequest {
    pub fn into_signup(self) -> Signup {
        Signup {
            name: self.name,
            email: self.email,
            password: self.password,
        }
    }
}

/// Request body for updating the current user.
///
/// Changing the password needs `old_password`, `password` and a matching
/// `confirm_password`.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "The email provided is invalid"))]
    #[schema(format = "email")]
    pub email: Option<String>,
    #[serde(alias = "oldPassword")]
    #[validate(length(min = 6, message = "The password must have at least 6 characters"))]
    #[schema(format = "password")]
    pub old_password: Option<String>,
    #[validate(length(min = 6, message = "The password must have at least 6 characters"))]
    #[schema(format = "password", min_length = 6)]
    pub password: Option<String>,
    #[serde(alias = "confirmPassword")]
    #[schema(format = "password")]
    pub confirm_password: Option<String>,
}

impl UpdateProfileRequest {
    pub fn into_profile_update(self) -> ProfileUpdate {
        ProfileUpdate {
            name: self.name,
            email: self.email,
            old_password: self.old_password,
            password: self.password,
            confirm_password: self.confirm_password,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Public user data (never includes the password hash).
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_accepts_camel_case_passwords() {
        let request: UpdateProfileRequest = serde_json::from_str(
            r#"{"oldPassword":"secret1","password":"secret2","confirmPassword":"secret2"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());

        let update = request.into_profile_update();
        assert_eq!(update.old_password.as_deref(), Some("secret1"));
        assert_eq!(update.confirm_password.as_deref(), Some("secret2"));
        assert!(update.name.is_none());
    }

    #[test]
    fn test_signup_request_validation() {
        let request = SignupRequest {
            name: String::new(),
            email: "not-an-email".to_string(),
            password: "12345".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 3);
    }
}
