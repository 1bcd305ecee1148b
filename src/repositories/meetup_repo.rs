//! Meetup repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use jiff_diesel::ToDiesel;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{DateRange, Meetup, MeetupChanges, NewMeetup, PageRequest};
use crate::schema::meetups;

/// Persistence seam for meetups.
///
/// Implementations only store and fetch; every business rule lives in
/// `MeetupService`.
#[async_trait]
pub trait MeetupRepository: Send + Sync {
    async fn create(&self, new_meetup: NewMeetup) -> AppResult<Meetup>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Meetup>>;

    /// Returns one page ordered by id ascending, plus the number of rows
    /// matching `range` across all pages. `range` bounds are inclusive.
    async fn list_paginated(
        &self,
        range: Option<DateRange>,
        page: PageRequest,
    ) -> AppResult<(Vec<Meetup>, i64)>;

    /// Applies `changes`; a missing meetup is `AppError::NotFound`.
    async fn update(&self, id: i32, changes: MeetupChanges) -> AppResult<Meetup>;

    /// Returns whether a row was deleted.
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = meetups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct MeetupRecord {
    id: i32,
    title: String,
    description: String,
    location: String,
    date: jiff_diesel::Timestamp,
    organizer_id: i32,
    banner_id: Option<i32>,
    created_at: jiff_diesel::Timestamp,
    updated_at: jiff_diesel::Timestamp,
}

impl From<MeetupRecord> for Meetup {
    fn from(record: MeetupRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            location: record.location,
            date: record.date.to_jiff(),
            organizer_id: record.organizer_id,
            banner_id: record.banner_id,
            created_at: record.created_at.to_jiff(),
            updated_at: record.updated_at.to_jiff(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = meetups)]
struct NewMeetupRecord {
    title: String,
    description: String,
    location: String,
    date: jiff_diesel::Timestamp,
    organizer_id: i32,
    banner_id: Option<i32>,
}

impl From<NewMeetup> for NewMeetupRecord {
    fn from(new_meetup: NewMeetup) -> Self {
        Self {
            title: new_meetup.title,
            description: new_meetup.description,
            location: new_meetup.location,
            date: new_meetup.date.to_diesel(),
            organizer_id: new_meetup.organizer_id,
            banner_id: new_meetup.banner_id,
        }
    }
}

/// `None` fields are skipped by diesel; `updated_at` is always written.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = meetups)]
struct MeetupChangeset {
    title: Option<String>,
    description: Option<String>,
    location: Option<String>,
    date: Option<jiff_diesel::Timestamp>,
    banner_id: Option<i32>,
    updated_at: jiff_diesel::Timestamp,
}

impl MeetupChangeset {
    fn new(changes: MeetupChanges, updated_at: Timestamp) -> Self {
        Self {
            title: changes.title,
            description: changes.description,
            location: changes.location,
            date: changes.date.map(|date| date.to_diesel()),
            banner_id: changes.banner_id,
            updated_at: updated_at.to_diesel(),
        }
    }
}

/// PostgreSQL meetup repository.
#[derive(Clone)]
pub struct PgMeetupRepository {
    pool: AsyncDbPool,
}

impl PgMeetupRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    fn filtered(range: Option<DateRange>) -> meetups::BoxedQuery<'static, diesel::pg::Pg> {
        let query = meetups::table.into_boxed();
        match range {
            Some(range) => query.filter(
                meetups::date.between(range.start.to_diesel(), range.end.to_diesel()),
            ),
            None => query,
        }
    }
}

#[async_trait]
impl MeetupRepository for PgMeetupRepository {
    async fn create(&self, new_meetup: NewMeetup) -> AppResult<Meetup> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(meetups::table)
            .values(NewMeetupRecord::from(new_meetup))
            .returning(MeetupRecord::as_returning())
            .get_result(&mut conn)
            .await
            .map(Meetup::from)
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert meetup"))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Meetup>> {
        let mut conn = self.pool.get().await?;

        meetups::table
            .find(id)
            .select(MeetupRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|record| record.map(Meetup::from))
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find meetup by id"))
    }

    async fn list_paginated(
        &self,
        range: Option<DateRange>,
        page: PageRequest,
    ) -> AppResult<(Vec<Meetup>, i64)> {
        let mut conn = self.pool.get().await?;

        let total: i64 = Self::filtered(range)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "count meetups"))?;

        let records = Self::filtered(range)
            .order(meetups::id.asc())
            .limit(page.limit())
            .offset(page.offset())
            .select(MeetupRecord::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list meetups"))?;

        Ok((records.into_iter().map(Meetup::from).collect(), total))
    }

    async fn update(&self, id: i32, changes: MeetupChanges) -> AppResult<Meetup> {
        let mut conn = self.pool.get().await?;

        diesel::update(meetups::table.find(id))
            .set(MeetupChangeset::new(changes, Timestamp::now()))
            .returning(MeetupRecord::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update meetup"))?
            .map(Meetup::from)
            .ok_or_else(|| AppError::not_found("meetup", "id", id))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut conn = self.pool.get().await?;

        diesel::delete(meetups::table.find(id))
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete meetup"))
    }
}
