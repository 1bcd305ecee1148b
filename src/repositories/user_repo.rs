//! User repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use jiff_diesel::ToDiesel;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{NewUser, User, UserChanges};
use crate::schema::users;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user; a taken email is `AppError::Duplicate`.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Applies `changes`; a missing user is `AppError::NotFound`.
    async fn update(&self, id: i32, changes: UserChanges) -> AppResult<User>;
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct UserRecord {
    id: i32,
    name: String,
    email: String,
    password_hash: String,
    created_at: jiff_diesel::Timestamp,
    updated_at: jiff_diesel::Timestamp,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            password_hash: record.password_hash,
            created_at: record.created_at.to_jiff(),
            updated_at: record.updated_at.to_jiff(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
struct NewUserRecord<'a> {
    name: &'a str,
    email: &'a str,
    password_hash: &'a str,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
struct UserChangeset {
    name: Option<String>,
    email: Option<String>,
    password_hash: Option<String>,
    updated_at: jiff_diesel::Timestamp,
}

/// PostgreSQL user repository.
///
/// `AsyncDbPool` is an `Arc` internally, so cloning is cheap.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: AsyncDbPool,
}

impl PgUserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(users::table)
            .values(NewUserRecord {
                name: &new_user.name,
                email: &new_user.email,
                password_hash: &new_user.password_hash,
            })
            .returning(UserRecord::as_returning())
            .get_result(&mut conn)
            .await
            .map(User::from)
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert user"))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let mut conn = self.pool.get().await?;

        users::table
            .find(id)
            .select(UserRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|record| record.map(User::from))
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find user by id"))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let mut conn = self.pool.get().await?;

        users::table
            .filter(users::email.eq(email))
            .select(UserRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|record| record.map(User::from))
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find user by email"))
    }

    async fn update(&self, id: i32, changes: UserChanges) -> AppResult<User> {
        let mut conn = self.pool.get().await?;

        let changeset = UserChangeset {
            name: changes.name,
            email: changes.email,
            password_hash: changes.password_hash,
            updated_at: Timestamp::now().to_diesel(),
        };

        diesel::update(users::table.find(id))
            .set(&changeset)
            .returning(UserRecord::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update user"))?
            .map(User::from)
            .ok_or_else(|| AppError::not_found("user", "id", id))
    }
}
