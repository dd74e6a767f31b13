//! Flexible-precision calendar dates.
//!
//! # Responsibility
//! - Represent year, year+month and year+month+day dates as one value.
//! - Validate the precision ladder once, at construction.
//! - Convert to/from the `<prefix>_year/_month/_day` column triple.
//!
//! # Invariants
//! - `year` is always present.
//! - `day` is present only when `month` is present.
//! - `month` is 1..=12 and `day` fits the month (leap years honored).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MONTHS_FULL: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTHS_ABBREVIATED: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Date precision ladder violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateValidationError {
    /// Year does not fit the supported range.
    YearOutOfRange(i64),
    /// Month is outside 1..=12.
    MonthOutOfRange(i64),
    /// Day is outside the valid range for its month.
    DayOutOfRange { year: i32, month: u8, day: i64 },
    /// Day was given without a month.
    DayWithoutMonth,
    /// Month or day was given without a year.
    MissingYear,
}

impl Display for DateValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::YearOutOfRange(year) => write!(f, "year {year} is out of range"),
            Self::MonthOutOfRange(month) => write!(f, "month {month} is out of range 1..=12"),
            Self::DayOutOfRange { year, month, day } => {
                write!(f, "day {day} does not exist in {year}-{month:02}")
            }
            Self::DayWithoutMonth => write!(f, "day requires a month"),
            Self::MissingYear => write!(f, "month or day requires a year"),
        }
    }
}

impl Error for DateValidationError {}

/// Month rendering style for [`PartialDate::format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthStyle {
    /// `1700-3-9`
    Numeric,
    /// `1700-03-09`
    Padded,
    /// `1700 March 9`
    FullName,
    /// `1700 Mar 9`
    Abbreviated,
}

/// Calendar date with year, year+month or year+month+day precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPartialDate")]
pub struct PartialDate {
    year: i32,
    month: Option<u8>,
    day: Option<u8>,
}

#[derive(Deserialize)]
struct RawPartialDate {
    year: i32,
    month: Option<u8>,
    day: Option<u8>,
}

impl TryFrom<RawPartialDate> for PartialDate {
    type Error = DateValidationError;

    fn try_from(raw: RawPartialDate) -> Result<Self, Self::Error> {
        PartialDate::new(raw.year, raw.month, raw.day)
    }
}

impl PartialDate {
    /// Builds a date after checking the precision ladder and ranges.
    pub fn new(year: i32, month: Option<u8>, day: Option<u8>) -> Result<Self, DateValidationError> {
        match (month, day) {
            (None, Some(_)) => Err(DateValidationError::DayWithoutMonth),
            (Some(month), _) if !(1..=12).contains(&month) => {
                Err(DateValidationError::MonthOutOfRange(i64::from(month)))
            }
            (Some(month), Some(day)) if day == 0 || day > days_in_month(year, month) => {
                Err(DateValidationError::DayOutOfRange {
                    year,
                    month,
                    day: i64::from(day),
                })
            }
            _ => Ok(Self { year, month, day }),
        }
    }

    /// Year-only date. Always valid.
    pub fn year_only(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    /// Year and month date.
    pub fn year_month(year: i32, month: u8) -> Result<Self, DateValidationError> {
        Self::new(year, Some(month), None)
    }

    /// Full year, month and day date.
    pub fn ymd(year: i32, month: u8, day: u8) -> Result<Self, DateValidationError> {
        Self::new(year, Some(month), Some(day))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Option<u8> {
        self.month
    }

    pub fn day(&self) -> Option<u8> {
        self.day
    }

    pub fn is_year_only(&self) -> bool {
        self.month.is_none()
    }

    /// Rebuilds an optional date from its three nullable columns.
    ///
    /// All-null columns mean "no date".
    pub fn from_columns(
        year: Option<i64>,
        month: Option<i64>,
        day: Option<i64>,
    ) -> Result<Option<Self>, DateValidationError> {
        let Some(year) = year else {
            if month.is_some() || day.is_some() {
                return Err(DateValidationError::MissingYear);
            }
            return Ok(None);
        };
        let year = i32::try_from(year).map_err(|_| DateValidationError::YearOutOfRange(year))?;
        let month = month
            .map(|value| u8::try_from(value).map_err(|_| DateValidationError::MonthOutOfRange(value)))
            .transpose()?;
        let day = match day {
            Some(value) => Some(u8::try_from(value).map_err(|_| DateValidationError::DayOutOfRange {
                year,
                month: month.unwrap_or(0),
                day: value,
            })?),
            None => None,
        };
        Self::new(year, month, day).map(Some)
    }

    /// Splits into `(year, month, day)` column values.
    pub fn to_columns(date: Option<Self>) -> (Option<i64>, Option<i64>, Option<i64>) {
        match date {
            Some(date) => (
                Some(i64::from(date.year)),
                date.month.map(i64::from),
                date.day.map(i64::from),
            ),
            None => (None, None, None),
        }
    }

    /// Renders year-first with the requested month style.
    pub fn format(&self, style: MonthStyle) -> String {
        let (separator, month) = match (style, self.month) {
            (_, None) => return self.year.to_string(),
            (MonthStyle::Numeric, Some(month)) => ("-", month.to_string()),
            (MonthStyle::Padded, Some(month)) => ("-", format!("{month:02}")),
            (MonthStyle::FullName, Some(month)) => (" ", month_name(month, &MONTHS_FULL)),
            (MonthStyle::Abbreviated, Some(month)) => (" ", month_name(month, &MONTHS_ABBREVIATED)),
        };
        let mut rendered = format!("{}{separator}{month}", self.year);
        if let Some(day) = self.day {
            match style {
                MonthStyle::Padded => rendered.push_str(&format!("{separator}{day:02}")),
                _ => rendered.push_str(&format!("{separator}{day}")),
            }
        }
        rendered
    }
}

impl Display for PartialDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format(MonthStyle::Padded))
    }
}

/// Parses month text stored by older files: `"3"`, `"03"`, `"March"`, `"mar"`.
pub fn month_from_text(value: &str) -> Option<u8> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(number) = trimmed.parse::<u8>() {
        return (1..=12).contains(&number).then_some(number);
    }
    let position = MONTHS_FULL
        .iter()
        .position(|name| name.eq_ignore_ascii_case(trimmed))
        .or_else(|| {
            MONTHS_ABBREVIATED
                .iter()
                .position(|name| name.eq_ignore_ascii_case(trimmed))
        })?;
    u8::try_from(position + 1).ok()
}

/// Number of days in `month` of `year` (proleptic Gregorian).
pub fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn month_name(month: u8, names: &[&str; 12]) -> String {
    names
        .get(usize::from(month).saturating_sub(1))
        .copied()
        .unwrap_or("?")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{month_from_text, DateValidationError, MonthStyle, PartialDate};

    #[test]
    fn day_without_month_is_rejected() {
        assert_eq!(
            PartialDate::new(1700, None, Some(3)),
            Err(DateValidationError::DayWithoutMonth)
        );
    }

    #[test]
    fn leap_day_depends_on_year() {
        assert!(PartialDate::ymd(1704, 2, 29).is_ok());
        assert!(matches!(
            PartialDate::ymd(1700, 2, 29),
            Err(DateValidationError::DayOutOfRange { day: 29, .. })
        ));
    }

    #[test]
    fn columns_without_year_are_rejected() {
        assert_eq!(
            PartialDate::from_columns(None, Some(4), None),
            Err(DateValidationError::MissingYear)
        );
        assert_eq!(PartialDate::from_columns(None, None, None), Ok(None));
    }

    #[test]
    fn columns_keep_precision() {
        let date = PartialDate::from_columns(Some(1712), Some(6), None)
            .unwrap()
            .unwrap();
        assert_eq!(date.month(), Some(6));
        assert_eq!(date.day(), None);
        assert_eq!(
            PartialDate::to_columns(Some(date)),
            (Some(1712), Some(6), None)
        );
    }

    #[test]
    fn format_styles() {
        let date = PartialDate::ymd(1700, 3, 9).unwrap();
        assert_eq!(date.format(MonthStyle::Numeric), "1700-3-9");
        assert_eq!(date.to_string(), "1700-03-09");
        assert_eq!(date.format(MonthStyle::FullName), "1700 March 9");
        assert_eq!(PartialDate::year_only(1650).format(MonthStyle::Abbreviated), "1650");
    }

    #[test]
    fn month_text_accepts_names_and_digits() {
        assert_eq!(month_from_text("March"), Some(3));
        assert_eq!(month_from_text(" dec "), Some(12));
        assert_eq!(month_from_text("07"), Some(7));
        assert_eq!(month_from_text("13"), None);
        assert_eq!(month_from_text("Brumaire"), None);
    }

    #[test]
    fn year_only_sorts_before_more_precise_dates() {
        let coarse = PartialDate::year_only(1700);
        let fine = PartialDate::year_month(1700, 1).unwrap();
        assert!(coarse < fine);
    }
}
