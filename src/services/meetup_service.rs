//! Meetup use cases: list, create, update and cancel.
//!
//! Failures are classified as `AppError` variants and mapped to HTTP
//! statuses by the API layer. Checks on an existing meetup always run in
//! the same order: existence, ownership, then the temporal lock.

use std::sync::Arc;

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::clock::Clock;
use crate::error::{AppError, AppResult};
use crate::models::{Meetup, MeetupChanges, NewMeetup, PageRequest};
use crate::repositories::MeetupRepository;
use crate::services::meetup_validator::{MeetupInput, MeetupValidator};

/// Fixed number of meetups per page.
pub const PAGE_SIZE: u32 = 10;

/// One page of meetups plus the number of matches across all pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetupPage {
    pub items: Vec<Meetup>,
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
}

#[derive(Clone)]
pub struct MeetupService {
    repo: Arc<dyn MeetupRepository>,
    clock: Arc<dyn Clock>,
    validator: MeetupValidator,
}

impl MeetupService {
    pub fn new(repo: Arc<dyn MeetupRepository>, clock: Arc<dyn Clock>, time_zone: TimeZone) -> Self {
        Self {
            repo,
            clock,
            validator: MeetupValidator::new(time_zone),
        }
    }

    /// Lists meetups by id, optionally restricted to one calendar day.
    ///
    /// # Arguments
    /// * `date` - `YYYY-MM-DD`, or a timestamp whose local date is used
    /// * `page` - 1-based page number
    pub async fn list(&self, date: Option<&str>, page: i64) -> AppResult<MeetupPage> {
        let page = u32::try_from(page)
            .ok()
            .filter(|page| *page >= 1)
            .ok_or_else(|| AppError::validation("page", "Page must be at least 1"))?;

        let range = match date {
            Some(value) => {
                let day = self.validator.parse_day(value)?;
                Some(self.validator.day_range(day)?)
            }
            None => None,
        };

        let (items, total) = self
            .repo
            .list_paginated(range, PageRequest::new(page, PAGE_SIZE))
            .await?;

        Ok(MeetupPage {
            items,
            page,
            page_size: PAGE_SIZE,
            total,
        })
    }

    /// Creates a meetup organized by `requester_id`.
    ///
    /// The stored date is the input truncated to the hour, and it must be
    /// strictly in the future.
    pub async fn create(&self, input: MeetupInput, requester_id: i32) -> AppResult<Meetup> {
        let draft = self.validator.validate_create(&input)?;

        if draft
            .organizer_id
            .is_some_and(|organizer_id| organizer_id != requester_id)
        {
            return Err(AppError::validation(
                "organizer_id",
                "Organizer must be the authenticated user",
            ));
        }

        let date = self.validator.ensure_future(draft.date, self.clock.now())?;

        let meetup = self
            .repo
            .create(NewMeetup {
                title: draft.title,
                description: draft.description,
                location: draft.location,
                date,
                organizer_id: requester_id,
                banner_id: draft.banner_id,
            })
            .await?;

        tracing::info!(meetup_id = meetup.id, organizer_id = requester_id, date = %meetup.date, "Meetup created");
        Ok(meetup)
    }

    /// Applies a partial update to an upcoming meetup owned by `requester_id`.
    pub async fn update(&self, id: i32, input: MeetupInput, requester_id: i32) -> AppResult<Meetup> {
        let now = self.clock.now();
        let current = self.find_mutable(id, requester_id, now).await?;

        let patch = self
            .validator
            .validate_update(&input, current.organizer_id)?;
        let date = patch
            .date
            .map(|date| self.validator.ensure_future(date, now))
            .transpose()?;

        let meetup = self
            .repo
            .update(
                id,
                MeetupChanges {
                    title: patch.title,
                    description: patch.description,
                    location: patch.location,
                    date,
                    banner_id: patch.banner_id,
                },
            )
            .await?;

        tracing::info!(meetup_id = id, organizer_id = requester_id, "Meetup updated");
        Ok(meetup)
    }

    /// Deletes an upcoming meetup owned by `requester_id` and returns it.
    pub async fn cancel(&self, id: i32, requester_id: i32) -> AppResult<Meetup> {
        let meetup = self.find_mutable(id, requester_id, self.clock.now()).await?;

        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("meetup", "id", id));
        }

        tracing::info!(meetup_id = id, organizer_id = requester_id, "Meetup cancelled");
        Ok(meetup)
    }

    async fn find_mutable(&self, id: i32, requester_id: i32, now: Timestamp) -> AppResult<Meetup> {
        let meetup = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("meetup", "id", id))?;

        if !meetup.is_organized_by(requester_id) {
            tracing::warn!(meetup_id = id, requester_id, "Rejected change by non-organizer");
            return Err(AppError::unauthorized(
                "Only the organizer can change this meetup",
            ));
        }

        if meetup.is_elapsed(now) {
            return Err(AppError::PastDate {
                date: meetup.date.to_string(),
            });
        }

        Ok(meetup)
    }
}
