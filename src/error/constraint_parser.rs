use regex::Regex;
use std::sync::OnceLock;

/// Extracts structured information from PostgreSQL constraint violations.
///
/// PostgreSQL reports the offending key in the error detail
/// (`Key (email)=(a@b.c) already exists.`) and names the constraint after
/// the table and column (`users_email_key`, `meetups_organizer_id_fkey`).
pub struct ConstraintParser;

/// Matches "Key (field)=(value)" in PostgreSQL error details
static KEY_VALUE: OnceLock<Regex> = OnceLock::new();

impl ConstraintParser {
    fn key_value_pattern() -> &'static Regex {
        KEY_VALUE.get_or_init(|| {
            Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("key/value pattern is valid")
        })
    }

    /// Parses a unique violation into `(entity, field, value)`.
    ///
    /// The constraint name wins when it follows the `{table}_{column}_key`
    /// convention; otherwise the key/value pair from the detail is used with
    /// a generic entity.
    pub fn parse_unique_violation(
        message: &str,
        details: Option<&str>,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = details
            .and_then(Self::extract_key_value)
            .or_else(|| Self::extract_key_value(message));

        if let Some((entity, field)) =
            constraint_name.and_then(|name| Self::split_constraint_name(name, "_key"))
        {
            let value = key_value
                .map(|(_, value)| value)
                .unwrap_or_else(|| "duplicate_value".to_string());
            return Some((entity, field, value));
        }

        key_value.map(|(field, value)| ("resource".to_string(), field, value))
    }

    /// Parses a foreign key violation into `(entity, field, value)`.
    pub fn parse_foreign_key_violation(
        message: &str,
        details: Option<&str>,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let (entity, field) =
            constraint_name.and_then(|name| Self::split_constraint_name(name, "_fkey"))?;
        let value = details
            .and_then(Self::extract_key_value)
            .or_else(|| Self::extract_key_value(message))
            .map(|(_, value)| value)
            .unwrap_or_default();
        Some((entity, field, value))
    }

    /// Splits `{table}_{column}{suffix}` into `(table, column)`.
    ///
    /// The table is the first segment; the column keeps any underscores.
    pub fn split_constraint_name(constraint_name: &str, suffix: &str) -> Option<(String, String)> {
        let stem = constraint_name.strip_suffix(suffix)?;
        let (entity, field) = stem.split_once('_')?;
        if entity.is_empty() || field.is_empty() {
            return None;
        }
        Some((entity.to_string(), field.to_string()))
    }

    /// Extracts the `(field, value)` pair from a "Key (field)=(value)" fragment.
    pub fn extract_key_value(text: &str) -> Option<(String, String)> {
        Self::key_value_pattern().captures(text).and_then(|caps| {
            let field = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().to_string();
            Some((field, value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unique_violation_with_constraint_and_details() {
        let result = ConstraintParser::parse_unique_violation(
            "duplicate key value violates unique constraint \"users_email_key\"",
            Some("Key (email)=(jane@example.com) already exists."),
            Some("users_email_key"),
        );
        assert_eq!(
            result,
            Some((
                "users".to_string(),
                "email".to_string(),
                "jane@example.com".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_unique_violation_without_constraint_name() {
        let result = ConstraintParser::parse_unique_violation(
            "duplicate key value violates unique constraint",
            Some("Key (email)=(jane@example.com) already exists."),
            None,
        );
        assert_eq!(
            result,
            Some((
                "resource".to_string(),
                "email".to_string(),
                "jane@example.com".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_unique_violation_unparseable() {
        assert_eq!(
            ConstraintParser::parse_unique_violation("something odd", None, None),
            None
        );
    }

    #[test]
    fn test_parse_foreign_key_violation() {
        let result = ConstraintParser::parse_foreign_key_violation(
            "insert or update on table \"meetups\" violates foreign key constraint",
            Some("Key (organizer_id)=(99) is not present in table \"users\"."),
            Some("meetups_organizer_id_fkey"),
        );
        assert_eq!(
            result,
            Some((
                "meetups".to_string(),
                "organizer_id".to_string(),
                "99".to_string()
            ))
        );
    }

    #[test]
    fn test_split_constraint_name() {
        assert_eq!(
            ConstraintParser::split_constraint_name("users_email_key", "_key"),
            Some(("users".to_string(), "email".to_string()))
        );
        assert_eq!(
            ConstraintParser::split_constraint_name("meetups_organizer_id_fkey", "_fkey"),
            Some(("meetups".to_string(), "organizer_id".to_string()))
        );
        assert_eq!(ConstraintParser::split_constraint_name("users_pkey", "_key"), None);
        assert_eq!(ConstraintParser::split_constraint_name("plain", "_key"), None);
    }
}
