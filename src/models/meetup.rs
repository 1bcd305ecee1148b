use jiff::Timestamp;
use serde::Serialize;

/// A scheduled meetup.
///
/// `date` is always hour-aligned in the configured timezone; the services
/// truncate it before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meetup {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: Timestamp,
    pub organizer_id: i32,
    pub banner_id: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Meetup {
    /// A meetup is elapsed once its date is at or before `now`.
    pub fn is_elapsed(&self, now: Timestamp) -> bool {
        self.date <= now
    }

    pub fn is_organized_by(&self, user_id: i32) -> bool {
        self.organizer_id == user_id
    }
}

/// Data required to insert a meetup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMeetup {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: Timestamp,
    pub organizer_id: i32,
    pub banner_id: Option<i32>,
}

/// Partial meetup update; `None` fields are left untouched.
///
/// The organizer is not part of it: ownership never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetupChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: Option<Timestamp>,
    pub banner_id: Option<i32>,
}

/// Inclusive range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl DateRange {
    pub fn contains(&self, instant: Timestamp) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// 1-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}
