//! User service for signup and profile management.
//!
//! Field formats (email shape, password length) are checked by the request
//! DTOs; this service enforces the rules that need stored state or span
//! several fields.

use std::sync::Arc;

use crate::error::{AppError, AppResult, ValidationFieldError};
use crate::models::{NewUser, User, UserChanges};
use crate::repositories::UserRepository;
use crate::utils::password::{hash_password, verify_password};

/// Signup data with the plain-text password.
#[derive(Debug, Clone)]
pub struct Signup {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub old_password: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl ProfileUpdate {
    /// Cross-field password rules.
    fn password_errors(&self) -> Vec<ValidationFieldError> {
        let mut errors = Vec::new();

        match (&self.old_password, &self.password) {
            (Some(_), None) => {
                errors.push(ValidationFieldError::new(
                    "password",
                    "You must provide a new password",
                ));
            }
            (None, Some(_)) => {
                errors.push(ValidationFieldError::new(
                    "old_password",
                    "The current password is required to set a new one",
                ));
            }
            _ => {}
        }

        if let Some(password) = &self.password {
            match &self.confirm_password {
                None => errors.push(ValidationFieldError::new(
                    "confirm_password",
                    "Password confirmation is required",
                )),
                Some(confirm) if confirm != password => errors.push(ValidationFieldError::new(
                    "confirm_password",
                    "Password confirmation does not match",
                )),
                Some(_) => {}
            }
        }

        errors.sort_by(|a, b| a.field.cmp(&b.field));
        errors
    }
}

/// User service for handling user-related business logic.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Registers a new user.
    ///
    /// # Returns
    /// The created user, or `Duplicate` when the email is taken
    pub async fn signup(&self, signup: Signup) -> AppResult<User> {
        if self.repo.find_by_email(&signup.email).await?.is_some() {
            return Err(Self::email_taken(signup.email));
        }

        let password_hash = hash_password(&signup.password)?;
        let user = self
            .repo
            .create(NewUser {
                name: signup.name,
                email: signup.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, "User signed up");
        Ok(user)
    }

    /// Gets a user by their ID.
    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("user", "id", id))
    }

    /// Looks up a user by email and checks the password.
    ///
    /// Unknown emails and wrong passwords yield the same error.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

        if !verify_password(password, &user.password_hash)? {
            tracing::warn!(user_id = user.id, "Login with wrong password");
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        Ok(user)
    }

    /// Updates the profile of user `id`.
    ///
    /// Changing the password requires the current one plus a matching
    /// confirmation.
    pub async fn update_profile(&self, id: i32, update: ProfileUpdate) -> AppResult<User> {
        let errors = update.password_errors();
        if !errors.is_empty() {
            return Err(AppError::ValidationErrors { errors });
        }

        let user = self.get_user(id).await?;

        let email = update.email.filter(|email| *email != user.email);
        if let Some(email) = &email
            && self.repo.find_by_email(email).await?.is_some()
        {
            return Err(Self::email_taken(email.clone()));
        }

        if let Some(old_password) = &update.old_password
            && !verify_password(old_password, &user.password_hash)?
        {
            return Err(AppError::unauthorized("Password does not match"));
        }

        let password_hash = update
            .password
            .as_deref()
            .map(hash_password)
            .transpose()?;

        let changes = UserChanges {
            name: update.name,
            email,
            password_hash,
        };
        if changes.is_empty() {
            return Ok(user);
        }

        let user = self.repo.update(id, changes).await?;
        tracing::info!(user_id = id, "User profile updated");
        Ok(user)
    }

    fn email_taken(email: String) -> AppError {
        AppError::Duplicate {
            entity: "users".to_string(),
            field: "email".to_string(),
            value: email,
        }
    }
}
