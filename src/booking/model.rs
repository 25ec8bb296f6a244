// region:    --- Imports
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// endregion: --- Imports

// region:    --- Models

/// Reservation of an item for a time window, subject to owner approval.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Booking {
    pub id: i64,
    #[serde(rename = "start")]
    pub start_date: DateTime<Utc>,
    #[serde(rename = "end")]
    pub end_date: DateTime<Utc>,
    pub item_id: i64,
    pub booker_id: i64,
    pub status: BookingStatus,
}

/// Booking creation body. The timestamps stay optional through
/// deserialization so absent values reach the validator and fail as a
/// BadRequest instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct NewBooking {
    pub item_id: i64,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Persisted booking status. WAITING transitions to APPROVED or REJECTED
/// via the owner decision; CANCELED exists as a value but no operation in
/// this service produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
    Canceled,
}

// endregion: --- Models

// region:    --- State filter

/// Listing filter keyword, parsed once at the HTTP boundary. Unknown
/// keywords fail fast with the distinguished UnsupportedState error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter {
    All,
    Waiting,
    Rejected,
    Canceled,
    Current,
    Future,
    Past,
}

impl FromStr for StateFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(StateFilter::All),
            "WAITING" => Ok(StateFilter::Waiting),
            "REJECTED" => Ok(StateFilter::Rejected),
            "CANCELED" => Ok(StateFilter::Canceled),
            "CURRENT" => Ok(StateFilter::Current),
            "FUTURE" => Ok(StateFilter::Future),
            "PAST" => Ok(StateFilter::Past),
            other => Err(AppError::UnsupportedState(other.to_string())),
        }
    }
}

// endregion: --- State filter

/// Validates the requested window: both timestamps present and start
/// strictly before end.
pub fn validate_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let (Some(start), Some(end)) = (start, end) else {
        return Err(AppError::BadRequest("Wrong timestamps.".to_string()));
    };
    if start >= end {
        return Err(AppError::BadRequest("Wrong timestamps.".to_string()));
    }
    Ok((start, end))
}

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, hour, 0, 0).unwrap()
    }

    #[test]
    fn parses_every_supported_keyword() {
        let cases = [
            ("ALL", StateFilter::All),
            ("WAITING", StateFilter::Waiting),
            ("REJECTED", StateFilter::Rejected),
            ("CANCELED", StateFilter::Canceled),
            ("CURRENT", StateFilter::Current),
            ("FUTURE", StateFilter::Future),
            ("PAST", StateFilter::Past),
        ];
        for (raw, expected) in cases {
            assert_eq!(raw.parse::<StateFilter>().unwrap(), expected);
        }
    }

    #[test]
    fn rejects_unknown_keyword_distinctly() {
        let err = "SOMEDAY".parse::<StateFilter>().unwrap_err();
        assert!(matches!(err, AppError::UnsupportedState(ref s) if s == "SOMEDAY"));
    }

    #[test]
    fn keyword_parsing_is_case_sensitive() {
        assert!("waiting".parse::<StateFilter>().is_err());
    }

    #[test]
    fn window_requires_both_timestamps() {
        assert!(validate_window(None, Some(at(12))).is_err());
        assert!(validate_window(Some(at(12)), None).is_err());
        assert!(validate_window(None, None).is_err());
    }

    #[test]
    fn window_rejects_equal_and_inverted_timestamps() {
        assert!(validate_window(Some(at(12)), Some(at(12))).is_err());
        assert!(validate_window(Some(at(14)), Some(at(12))).is_err());
    }

    #[test]
    fn window_accepts_ordered_timestamps() {
        let (start, end) = validate_window(Some(at(10)), Some(at(12))).unwrap();
        assert!(start < end);
    }

    #[test]
    fn status_serializes_uppercase() {
        let json = serde_json::to_string(&BookingStatus::Waiting).unwrap();
        assert_eq!(json, "\"WAITING\"");
        let back: BookingStatus = serde_json::from_str("\"APPROVED\"").unwrap();
        assert_eq!(back, BookingStatus::Approved);
    }
}

// endregion: --- Tests
