//! Parsing of the free-text answers typed at task prompts.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyTitle,
    EmptyInput(&'static str),
    InvalidDate(String),
    InvalidIndex(String),
    InvalidField(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyTitle => write!(f, "Title cannot be empty"),
            ValidationError::EmptyInput(what) => write!(f, "Please enter {what}"),
            ValidationError::InvalidDate(input) => {
                write!(f, "Invalid date '{input}'. Use DD-MM-YYYY")
            }
            ValidationError::InvalidIndex(input) => write!(f, "Invalid task number '{input}'"),
            ValidationError::InvalidField(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Parse a `DD-MM-YYYY` date. Empty input means "no date".
pub fn parse_due_date(input: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let invalid = || ValidationError::InvalidDate(input.to_string());
    let mut parts = input.split('-');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    if [day, month, year]
        .iter()
        .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(invalid());
    }

    let day: u32 = day.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day)
        .map(Some)
        .ok_or_else(invalid)
}

pub fn format_due_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Resolve a typed reference to a task identifier.
///
/// A number with an entry in `index_map` becomes that task's id; anything
/// else is passed through as a literal identifier.
pub fn parse_task_id_or_index(input: &str, index_map: &BTreeMap<usize, String>) -> String {
    let input = input.trim();
    input
        .parse::<usize>()
        .ok()
        .and_then(|index| index_map.get(&index))
        .cloned()
        .unwrap_or_else(|| input.to_string())
}

/// Resolve a 1-based index that must exist in `index_map`.
pub fn parse_task_index(
    input: &str,
    index_map: &BTreeMap<usize, String>,
) -> Result<String, ValidationError> {
    let input = input.trim();
    input
        .parse::<usize>()
        .ok()
        .and_then(|index| index_map.get(&index))
        .cloned()
        .ok_or_else(|| ValidationError::InvalidIndex(input.to_string()))
}

/// Split comma-separated tags, dropping blanks.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Empty or whitespace-only text becomes `None`.
pub fn optional_text(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn index_map() -> BTreeMap<usize, String> {
        [(1, "a"), (2, "b"), (3, "c")]
            .into_iter()
            .map(|(i, id)| (i, id.to_string()))
            .collect()
    }

    #[test]
    fn due_date_round_trips_for_every_day() {
        let mut date = NaiveDate::from_ymd_opt(1999, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2030, 12, 31).unwrap();
        while date <= end {
            let text = format_due_date(date);
            assert_eq!(parse_due_date(&text), Ok(Some(date)), "{text}");
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn due_date_accepts_leap_day_only_in_leap_years() {
        let leap = parse_due_date("29-02-2024").unwrap().unwrap();
        assert_eq!((leap.day(), leap.month(), leap.year()), (29, 2, 2024));
        assert!(parse_due_date("29-02-2023").is_err());
    }

    #[test]
    fn due_date_rejects_malformed_input() {
        for input in [
            "31-04-2025",
            "2025-01-31",
            "1-1",
            "aa-bb-cccc",
            "01-13-2025",
            "00-01-2025",
            "01-01-2025-01",
            "01/01/2025",
            "+1-01-2025",
        ] {
            assert!(parse_due_date(input).is_err(), "{input} should fail");
        }
    }

    #[test]
    fn empty_due_date_means_none() {
        assert_eq!(parse_due_date(""), Ok(None));
        assert_eq!(parse_due_date("   "), Ok(None));
    }

    #[test]
    fn task_reference_resolution() {
        let map = index_map();
        assert_eq!(parse_task_id_or_index("3", &map), "c");
        assert_eq!(parse_task_id_or_index(" 1 ", &map), "a");
        assert_eq!(parse_task_id_or_index("9", &map), "9");
        assert_eq!(parse_task_id_or_index("not-a-number", &map), "not-a-number");
    }

    #[test]
    fn strict_index_resolution() {
        let map = index_map();
        assert_eq!(parse_task_index("2", &map), Ok("b".to_string()));
        assert_eq!(
            parse_task_index("0", &map),
            Err(ValidationError::InvalidIndex("0".into()))
        );
        assert!(parse_task_index("abc", &map).is_err());
    }

    #[test]
    fn tags_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(parse_tags(" work, home ,,urgent "), vec!["work", "home", "urgent"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ").is_empty());
    }

    #[test]
    fn optional_text_trims() {
        assert_eq!(optional_text("  "), None);
        assert_eq!(optional_text(" hi "), Some("hi".to_string()));
    }
}
