//! Shape and temporal rules for meetup payloads.
//!
//! Everything here is pure: the current instant is passed in by the caller
//! and the timezone is fixed at construction.

use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use jiff::{RoundMode, SignedDuration, Timestamp, Unit, Zoned, ZonedRound};
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult, ValidationFieldError};
use crate::models::DateRange;

/// Raw meetup payload, shared by create and update.
///
/// Every field is optional at this level; create-only presence rules are
/// applied by [`MeetupValidator::validate_create`].
#[derive(Debug, Clone, Default, Validate)]
pub struct MeetupInput {
    #[validate(custom(function = "not_blank", message = "Title must not be blank"))]
    pub title: Option<String>,
    #[validate(custom(function = "not_blank", message = "Description must not be blank"))]
    pub description: Option<String>,
    #[validate(custom(function = "not_blank", message = "Location must not be blank"))]
    pub location: Option<String>,
    pub date: Option<String>,
    #[validate(range(min = 1, max = 2147483647, message = "Organizer id must be a positive integer"))]
    pub organizer_id: Option<i64>,
    #[validate(range(min = 1, max = 2147483647, message = "Banner id must be a positive integer"))]
    pub banner_id: Option<i64>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Create payload after shape validation. `date` is not yet truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetupDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: Timestamp,
    pub organizer_id: Option<i32>,
    pub banner_id: Option<i32>,
}

/// Update payload after shape validation. `date` is not yet truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetupPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: Option<Timestamp>,
    pub banner_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct MeetupValidator {
    time_zone: TimeZone,
}

impl MeetupValidator {
    pub fn new(time_zone: TimeZone) -> Self {
        Self { time_zone }
    }

    /// Checks a create payload, reporting every offending field at once.
    pub fn validate_create(&self, input: &MeetupInput) -> AppResult<MeetupDraft> {
        let mut errors = Self::shape_errors(input);

        for (field, value, message) in [
            ("title", &input.title, "Title is required"),
            ("description", &input.description, "Description is required"),
            ("location", &input.location, "Location is required"),
            ("date", &input.date, "Date is required"),
        ] {
            if value.is_none() {
                errors.push(ValidationFieldError::new(field, message));
            }
        }

        let date = self.parse_date_field(input.date.as_deref(), &mut errors);
        Self::finish(errors)?;

        match (&input.title, &input.description, &input.location, date) {
            (Some(title), Some(description), Some(location), Some(date)) => Ok(MeetupDraft {
                title: title.trim().to_string(),
                description: description.trim().to_string(),
                location: location.trim().to_string(),
                date,
                organizer_id: input.organizer_id.and_then(|id| i32::try_from(id).ok()),
                banner_id: input.banner_id.and_then(|id| i32::try_from(id).ok()),
            }),
            _ => Err(AppError::validation("date", "Date is required")),
        }
    }

    /// Checks an update payload. The organizer can never be changed; an
    /// `organizer_id` equal to `current_organizer` is accepted and ignored.
    pub fn validate_update(
        &self,
        input: &MeetupInput,
        current_organizer: i32,
    ) -> AppResult<MeetupPatch> {
        let mut errors = Self::shape_errors(input);

        if input
            .organizer_id
            .is_some_and(|id| id != i64::from(current_organizer))
        {
            errors.push(ValidationFieldError::new(
                "organizer_id",
                "Organizer cannot be changed",
            ));
        }

        let date = self.parse_date_field(input.date.as_deref(), &mut errors);
        Self::finish(errors)?;

        Ok(MeetupPatch {
            title: input.title.as_deref().map(|s| s.trim().to_string()),
            description: input.description.as_deref().map(|s| s.trim().to_string()),
            location: input.location.as_deref().map(|s| s.trim().to_string()),
            date,
            banner_id: input.banner_id.and_then(|id| i32::try_from(id).ok()),
        })
    }

    /// Truncates `date` to the start of its hour in the configured timezone.
    pub fn truncate_to_hour(&self, date: Timestamp) -> AppResult<Timestamp> {
        date.to_zoned(self.time_zone.clone())
            .round(ZonedRound::new().smallest(Unit::Hour).mode(RoundMode::Trunc))
            .map(|zoned| zoned.timestamp())
            .map_err(|e| AppError::validation("date", format!("Date is out of range: {e}")))
    }

    /// Returns the hour-truncated `date` if it is strictly after `now`.
    pub fn ensure_future(&self, date: Timestamp, now: Timestamp) -> AppResult<Timestamp> {
        let truncated = self.truncate_to_hour(date)?;
        if truncated <= now {
            return Err(AppError::PastDate {
                date: truncated.to_string(),
            });
        }
        Ok(truncated)
    }

    /// Parses a meetup date.
    ///
    /// Accepts an RFC 3339 instant, a zoned datetime with a bracketed zone,
    /// or a civil datetime/date read in the configured timezone.
    pub fn parse_date(&self, value: &str) -> Option<Timestamp> {
        let value = value.trim();
        if let Ok(timestamp) = value.parse::<Timestamp>() {
            return Some(timestamp);
        }
        if let Ok(zoned) = value.parse::<Zoned>() {
            return Some(zoned.timestamp());
        }
        if let Ok(datetime) = value.parse::<DateTime>() {
            return datetime
                .to_zoned(self.time_zone.clone())
                .ok()
                .map(|zoned| zoned.timestamp());
        }
        value
            .parse::<Date>()
            .ok()
            .and_then(|date| date.to_zoned(self.time_zone.clone()).ok())
            .map(|zoned| zoned.timestamp())
    }

    /// Parses a list filter into the calendar date it designates.
    ///
    /// Instants are converted to the configured timezone first, so
    /// `2024-01-15T02:00:00Z` is January 14th in `America/Sao_Paulo`.
    pub fn parse_day(&self, value: &str) -> AppResult<Date> {
        let value = value.trim();
        let day = if let Ok(timestamp) = value.parse::<Timestamp>() {
            Some(timestamp.to_zoned(self.time_zone.clone()).date())
        } else if let Ok(zoned) = value.parse::<Zoned>() {
            Some(zoned.with_time_zone(self.time_zone.clone()).date())
        } else if let Ok(date) = value.parse::<Date>() {
            Some(date)
        } else {
            value.parse::<DateTime>().ok().map(|datetime| datetime.date())
        };

        day.ok_or_else(|| {
            AppError::validation(
                "date",
                "Date must be a calendar date (YYYY-MM-DD) or an ISO-8601 timestamp",
            )
        })
    }

    /// Inclusive range from the start of `day` to the last nanosecond
    /// before the next day starts, in the configured timezone.
    pub fn day_range(&self, day: Date) -> AppResult<DateRange> {
        let out_of_range =
            |e: jiff::Error| AppError::validation("date", format!("Date is out of range: {e}"));

        let start = day
            .to_zoned(self.time_zone.clone())
            .and_then(|zoned| zoned.start_of_day())
            .map_err(out_of_range)?;
        let next = day
            .tomorrow()
            .and_then(|tomorrow| tomorrow.to_zoned(self.time_zone.clone()))
            .and_then(|zoned| zoned.start_of_day())
            .map_err(out_of_range)?;
        let end = next
            .timestamp()
            .checked_sub(SignedDuration::from_nanos(1))
            .map_err(out_of_range)?;

        Ok(DateRange {
            start: start.timestamp(),
            end,
        })
    }

    fn shape_errors(input: &MeetupInput) -> Vec<ValidationFieldError> {
        input
            .validate()
            .err()
            .map(|errors| ValidationFieldError::from_validation_errors(&errors))
            .unwrap_or_default()
    }

    fn parse_date_field(
        &self,
        value: Option<&str>,
        errors: &mut Vec<ValidationFieldError>,
    ) -> Option<Timestamp> {
        let value = value?;
        let parsed = self.parse_date(value);
        if parsed.is_none() {
            errors.push(ValidationFieldError::new(
                "date",
                format!("'{value}' is not a valid date"),
            ));
        }
        parsed
    }

    fn finish(mut errors: Vec<ValidationFieldError>) -> AppResult<()> {
        if errors.is_empty() {
            return Ok(());
        }
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        Err(AppError::ValidationErrors { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::tz;
    use proptest::prelude::*;

    fn utc() -> MeetupValidator {
        MeetupValidator::new(TimeZone::UTC)
    }

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn full_input() -> MeetupInput {
        MeetupInput {
            title: Some("Rust meetup".to_string()),
            description: Some("Talks about async".to_string()),
            location: Some("Room 42".to_string()),
            date: Some("2030-05-01T18:30:00Z".to_string()),
            organizer_id: None,
            banner_id: Some(3),
        }
    }

    fn error_fields(err: AppError) -> Vec<String> {
        match err {
            AppError::ValidationErrors { errors } => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_create_accepts_full_payload() {
        let draft = utc().validate_create(&full_input()).unwrap();
        assert_eq!(draft.title, "Rust meetup");
        assert_eq!(draft.date, ts("2030-05-01T18:30:00Z"));
        assert_eq!(draft.banner_id, Some(3));
        assert_eq!(draft.organizer_id, None);
    }

    #[test]
    fn test_validate_create_trims_text() {
        let input = MeetupInput {
            title: Some("  Rust  ".to_string()),
            ..full_input()
        };
        assert_eq!(utc().validate_create(&input).unwrap().title, "Rust");
    }

    #[test]
    fn test_validate_create_reports_every_missing_field() {
        let err = utc().validate_create(&MeetupInput::default()).unwrap_err();
        assert_eq!(
            error_fields(err),
            vec!["date", "description", "location", "title"]
        );
    }

    #[test]
    fn test_validate_create_rejects_blank_and_bad_ids() {
        let input = MeetupInput {
            title: Some("   ".to_string()),
            organizer_id: Some(0),
            banner_id: Some(-4),
            ..full_input()
        };
        let err = utc().validate_create(&input).unwrap_err();
        assert_eq!(error_fields(err), vec!["banner_id", "organizer_id", "title"]);
    }

    #[test]
    fn test_validate_create_rejects_unparseable_date() {
        let input = MeetupInput {
            date: Some("next tuesday".to_string()),
            ..full_input()
        };
        match utc().validate_create(&input).unwrap_err() {
            AppError::ValidationErrors { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "date");
                assert!(errors[0].message.contains("next tuesday"));
            }
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_update_allows_empty_payload() {
        let patch = utc().validate_update(&MeetupInput::default(), 1).unwrap();
        assert_eq!(patch, MeetupPatch::default());
    }

    #[test]
    fn test_validate_update_rejects_organizer_change() {
        let input = MeetupInput {
            organizer_id: Some(2),
            ..Default::default()
        };
        let err = utc().validate_update(&input, 1).unwrap_err();
        assert_eq!(error_fields(err), vec!["organizer_id"]);
    }

    #[test]
    fn test_validate_update_accepts_unchanged_organizer() {
        let input = MeetupInput {
            title: Some(" Rust Night ".to_string()),
            organizer_id: Some(1),
            ..Default::default()
        };
        let patch = utc().validate_update(&input, 1).unwrap();
        assert_eq!(patch.title.as_deref(), Some("Rust Night"));
    }

    #[test]
    fn test_validate_update_checks_present_fields() {
        let input = MeetupInput {
            location: Some(String::new()),
            date: Some("2030-13-01".to_string()),
            ..Default::default()
        };
        let err = utc().validate_update(&input, 1).unwrap_err();
        assert_eq!(error_fields(err), vec!["date", "location"]);
    }

    #[test]
    fn test_parse_date_formats() {
        let validator = MeetupValidator::new(tz::offset(-3).to_time_zone());
        assert_eq!(
            validator.parse_date("2030-05-01T18:30:00Z"),
            Some(ts("2030-05-01T18:30:00Z"))
        );
        assert_eq!(
            validator.parse_date("2030-05-01T18:30:00+02:00"),
            Some(ts("2030-05-01T16:30:00Z"))
        );
        // Civil values are read in the configured timezone.
        assert_eq!(
            validator.parse_date("2030-05-01T18:30:00"),
            Some(ts("2030-05-01T21:30:00Z"))
        );
        assert_eq!(
            validator.parse_date("2030-05-01"),
            Some(ts("2030-05-01T03:00:00Z"))
        );
        assert_eq!(validator.parse_date("yesterday"), None);
    }

    #[test]
    fn test_truncate_to_hour_uses_configured_timezone() {
        let validator = MeetupValidator::new(tz::offset(5).to_time_zone());
        assert_eq!(
            validator.truncate_to_hour(ts("2030-05-01T18:59:59.999Z")).unwrap(),
            ts("2030-05-01T18:00:00Z")
        );

        // A half-hour offset moves hour boundaries.
        let kolkata = MeetupValidator::new(TimeZone::fixed(tz::Offset::from_seconds(19800).unwrap()));
        assert_eq!(
            kolkata.truncate_to_hour(ts("2030-05-01T18:20:00Z")).unwrap(),
            ts("2030-05-01T17:30:00Z")
        );
    }

    #[test]
    fn test_ensure_future() {
        let validator = utc();
        let now = ts("2030-05-01T10:15:00Z");

        assert_eq!(
            validator.ensure_future(ts("2030-05-01T11:05:00Z"), now).unwrap(),
            ts("2030-05-01T11:00:00Z")
        );
        // Same hour as now truncates to before now.
        assert!(matches!(
            validator.ensure_future(ts("2030-05-01T10:45:00Z"), now),
            Err(AppError::PastDate { .. })
        ));
        assert!(matches!(
            validator.ensure_future(ts("2030-05-01T10:00:00Z"), ts("2030-05-01T10:00:00Z")),
            Err(AppError::PastDate { .. })
        ));
    }

    #[test]
    fn test_parse_day() {
        let validator = MeetupValidator::new(tz::offset(-3).to_time_zone());
        let expected: Date = "2024-01-15".parse().unwrap();

        assert_eq!(validator.parse_day("2024-01-15").unwrap(), expected);
        assert_eq!(validator.parse_day("2024-01-15T23:00:00").unwrap(), expected);
        assert_eq!(validator.parse_day("2024-01-16T02:00:00Z").unwrap(), expected);
        assert!(matches!(
            validator.parse_day("15/01/2024"),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_day_range_in_offset_timezone() {
        let validator = MeetupValidator::new(tz::offset(-3).to_time_zone());
        let range = validator.day_range("2024-01-15".parse().unwrap()).unwrap();

        assert_eq!(range.start, ts("2024-01-15T03:00:00Z"));
        assert_eq!(range.end, ts("2024-01-16T02:59:59.999999999Z"));
    }

    proptest! {
        #[test]
        fn prop_truncation_is_hour_aligned_and_not_later(secs in 0i64..4_000_000_000i64) {
            let validator = utc();
            let date = Timestamp::from_second(secs).unwrap();
            let truncated = validator.truncate_to_hour(date).unwrap();

            prop_assert!(truncated <= date);
            prop_assert!(date.duration_since(truncated) < SignedDuration::from_hours(1));
            prop_assert_eq!(truncated.as_second() % 3600, 0);
            prop_assert_eq!(validator.truncate_to_hour(truncated).unwrap(), truncated);
        }
    }
}
