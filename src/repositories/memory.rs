//! In-memory repositories.
//!
//! Backs the service and router tests. Ids are assigned sequentially
//! starting at 1, like a fresh PostgreSQL sequence.

use std::collections::BTreeMap;

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{
    DateRange, Meetup, MeetupChanges, NewMeetup, NewUser, PageRequest, User, UserChanges,
};
use crate::repositories::{MeetupRepository, UserRepository};

#[derive(Debug)]
struct Table<T> {
    next_id: i32,
    rows: BTreeMap<i32, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut table = self.table.write().await;

        if table.rows.values().any(|user| user.email == new_user.email) {
            return Err(AppError::Duplicate {
                entity: "users".to_string(),
                field: "email".to_string(),
                value: new_user.email,
            });
        }

        let now = Timestamp::now();
        let user = User {
            id: table.allocate_id(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|user| user.email == email).cloned())
    }

    async fn update(&self, id: i32, changes: UserChanges) -> AppResult<User> {
        let mut table = self.table.write().await;

        if let Some(email) = &changes.email
            && table
                .rows
                .values()
                .any(|user| user.id != id && &user.email == email)
        {
            return Err(AppError::Duplicate {
                entity: "users".to_string(),
                field: "email".to_string(),
                value: email.clone(),
            });
        }

        let user = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("user", "id", id))?;

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Timestamp::now();

        Ok(user.clone())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryMeetupRepository {
    table: RwLock<Table<Meetup>>,
}

#[async_trait]
impl MeetupRepository for InMemoryMeetupRepository {
    async fn create(&self, new_meetup: NewMeetup) -> AppResult<Meetup> {
        let mut table = self.table.write().await;

        let now = Timestamp::now();
        let meetup = Meetup {
            id: table.allocate_id(),
            title: new_meetup.title,
            description: new_meetup.description,
            location: new_meetup.location,
            date: new_meetup.date,
            organizer_id: new_meetup.organizer_id,
            banner_id: new_meetup.banner_id,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(meetup.id, meetup.clone());
        Ok(meetup)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Meetup>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn list_paginated(
        &self,
        range: Option<DateRange>,
        page: PageRequest,
    ) -> AppResult<(Vec<Meetup>, i64)> {
        let table = self.table.read().await;

        // BTreeMap iterates in id order.
        let matching: Vec<&Meetup> = table
            .rows
            .values()
            .filter(|meetup| range.is_none_or(|range| range.contains(meetup.date)))
            .collect();

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(0))
            .cloned()
            .collect();

        Ok((items, total))
    }

    async fn update(&self, id: i32, changes: MeetupChanges) -> AppResult<Meetup> {
        let mut table = self.table.write().await;

        let meetup = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("meetup", "id", id))?;

        if let Some(title) = changes.title {
            meetup.title = title;
        }
        if let Some(description) = changes.description {
            meetup.description = description;
        }
        if let Some(location) = changes.location {
            meetup.location = location;
        }
        if let Some(date) = changes.date {
            meetup.date = date;
        }
        if let Some(banner_id) = changes.banner_id {
            meetup.banner_id = Some(banner_id);
        }
        meetup.updated_at = Timestamp::now();

        Ok(meetup.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
