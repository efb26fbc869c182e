use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;

use crate::ValidationError;

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(input: &str) -> Result<Date, ValidationError> {
    Date::parse(input.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        value: input.to_owned(),
    })
}

/// Format a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Inclusive calendar date range with `begin <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DateRangeBounds", into = "DateRangeBounds")]
pub struct DateRange {
    begin: Date,
    end: Date,
}

impl DateRange {
    pub fn new(begin: Date, end: Date) -> Result<Self, ValidationError> {
        if begin > end {
            return Err(ValidationError::InvertedDateRange {
                begin: format_date(begin),
                end: format_date(end),
            });
        }
        Ok(Self { begin, end })
    }

    pub fn parse(begin: &str, end: &str) -> Result<Self, ValidationError> {
        Self::new(parse_date(begin)?, parse_date(end)?)
    }

    pub const fn begin(&self) -> Date {
        self.begin
    }

    pub const fn end(&self) -> Date {
        self.end
    }

    /// Text form sent on writes: `[YYYY-MM-DD, YYYY-MM-DD]`.
    pub fn to_wire_text(&self) -> String {
        format!("[{}, {}]", format_date(self.begin), format_date(self.end))
    }

    /// Inverse of [`DateRange::to_wire_text`].
    pub fn parse_wire_text(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDateRangeText {
            value: input.to_owned(),
        };

        let inner = input
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(invalid)?;
        let (begin, end) = inner.split_once(',').ok_or_else(invalid)?;

        Self::parse(begin, end)
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", format_date(self.begin), format_date(self.end))
    }
}

/// Read-side wire shape, `{"lower": "...", "upper": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct DateRangeBounds {
    lower: String,
    upper: String,
}

impl TryFrom<DateRangeBounds> for DateRange {
    type Error = ValidationError;

    fn try_from(value: DateRangeBounds) -> Result<Self, Self::Error> {
        Self::parse(&value.lower, &value.upper)
    }
}

impl From<DateRange> for DateRangeBounds {
    fn from(value: DateRange) -> Self {
        Self {
            lower: format_date(value.begin),
            upper: format_date(value.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_wire_text() {
        let range = DateRange::parse("2023-01-01", "2023-12-31").expect("valid range");
        assert_eq!(range.to_wire_text(), "[2023-01-01, 2023-12-31]");
    }

    #[test]
    fn parses_wire_text_with_spaces() {
        let range = DateRange::parse_wire_text("[2023-01-01,  2023-12-31]").expect("valid text");
        assert_eq!(format_date(range.end()), "2023-12-31");
    }

    #[test]
    fn rejects_inverted_range() {
        let err = DateRange::parse("2024-02-01", "2024-01-01").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvertedDateRange { .. }));
    }

    #[test]
    fn same_day_range_is_valid() {
        assert!(DateRange::parse("2024-01-01", "2024-01-01").is_ok());
    }

    #[test]
    fn reads_lower_upper_object() {
        let range: DateRange =
            serde_json::from_str(r#"{"lower":"2023-01-01","upper":"2023-06-30"}"#)
                .expect("bounds should decode");
        assert_eq!(range.to_string(), "2023-01-01 - 2023-06-30");
    }

    #[test]
    fn rejects_malformed_wire_text() {
        let err = DateRange::parse_wire_text("2023-01-01/2023-12-31").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDateRangeText { .. }));
    }
}
