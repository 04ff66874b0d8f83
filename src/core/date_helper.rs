//! Calendar, formatting and conversion helpers.
//!
//! Functions that take their subject as an `Option` return `None` (or
//! `Ok(None)`) when the subject is absent. Hard failures are reserved for
//! malformed patterns, non-conforming text and out-of-range arguments.

use crate::adapters::clock::SystemClock;
use crate::core::pattern::DatePattern;
use crate::domain::model::{CivilDate, CivilDateTime, LegacyInstant, LocalZone};
use crate::domain::ports::{Clock, ConfigProvider};
use crate::utils::error::{DateHelperError, Result};
use crate::utils::validation::validate_range;
use chrono::{Days, NaiveTime};

pub const DEFAULT_PATTERN: &str = "yyyy-MM-dd HH:mm:ss";
pub const DEFAULT_DATE_PATTERN: &str = "yyyy-MM-dd";

/// Clock and zone dependent operations with both dependencies injected.
#[derive(Debug, Clone)]
pub struct DateHelper<C: Clock = SystemClock> {
    clock: C,
    zone: LocalZone,
}

impl DateHelper<SystemClock> {
    /// Host clock and host time zone.
    pub fn system() -> Self {
        Self::new(SystemClock, LocalZone::System)
    }

    /// Host clock with the configured zone.
    pub fn from_config<P: ConfigProvider>(config: &P) -> Result<Self> {
        Ok(Self::new(SystemClock, config.zone()?))
    }
}

impl Default for DateHelper<SystemClock> {
    fn default() -> Self {
        Self::system()
    }
}

impl<C: Clock> DateHelper<C> {
    pub fn new(clock: C, zone: LocalZone) -> Self {
        Self { clock, zone }
    }

    pub fn zone(&self) -> LocalZone {
        self.zone
    }

    pub fn now_instant(&self) -> LegacyInstant {
        LegacyInstant::from_datetime(self.clock.now())
    }

    /// Millisecond precision, like [`DateHelper::now_instant`].
    pub fn now_datetime(&self) -> CivilDateTime {
        self.zone.to_civil(self.now_instant())
    }

    pub fn now_date(&self) -> CivilDate {
        self.now_datetime().date()
    }

    pub fn to_civil(&self, instant: Option<LegacyInstant>) -> Option<CivilDateTime> {
        instant.map(|instant| self.zone.to_civil(instant))
    }

    pub fn from_civil(&self, date: Option<&CivilDateTime>) -> Result<Option<LegacyInstant>> {
        date.map(|date| self.zone.from_civil(date)).transpose()
    }
}

pub fn now_datetime() -> CivilDateTime {
    DateHelper::system().now_datetime()
}

pub fn now_date() -> CivilDate {
    DateHelper::system().now_date()
}

/// The pattern is only compiled when there is a date to render.
pub fn format(date: Option<&CivilDateTime>, pattern: &str) -> Result<Option<String>> {
    match date {
        Some(date) => DatePattern::compile(pattern)?.format(date).map(Some),
        None => Ok(None),
    }
}

/// Blank text counts as absent. Anything else must match `pattern` exactly.
pub fn parse(text: Option<&str>, pattern: &str) -> Result<Option<CivilDateTime>> {
    match text {
        Some(text) if !text.trim().is_empty() => {
            DatePattern::compile(pattern)?.parse(text).map(Some)
        }
        _ => Ok(None),
    }
}

/// Signed number of calendar days from `a` to `b`.
pub fn days_between(a: CivilDate, b: CivilDate) -> i64 {
    b.signed_duration_since(a).num_days()
}

pub fn add_days(date: Option<CivilDateTime>, days: i64) -> Result<Option<CivilDateTime>> {
    let Some(date) = date else {
        return Ok(None);
    };

    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };

    shifted.map(Some).ok_or_else(|| DateHelperError::InvalidArgument {
        field: "days".to_string(),
        value: days.to_string(),
        reason: format!("shifting {} leaves the supported calendar range", date),
    })
}

/// Inclusive at both ends. An inverted range contains nothing.
pub fn in_range(
    date: Option<&CivilDateTime>,
    start: Option<&CivilDateTime>,
    end: Option<&CivilDateTime>,
) -> bool {
    match (date, start, end) {
        (Some(date), Some(start), Some(end)) => start <= date && date <= end,
        _ => false,
    }
}

pub fn start_of_day(date: Option<CivilDateTime>) -> Option<CivilDateTime> {
    date.map(|date| date.date().and_time(NaiveTime::MIN))
}

/// 23:59:59 with no sub-second part.
pub fn end_of_day(date: Option<CivilDateTime>) -> Option<CivilDateTime> {
    date.and_then(|date| date.date().and_hms_opt(23, 59, 59))
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    validate_range("month", month, 1, 12)?;
    let days = match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    };
    Ok(days)
}

/// Uses the host time zone at call time. See [`DateHelper::to_civil`].
pub fn to_civil(instant: Option<LegacyInstant>) -> Option<CivilDateTime> {
    DateHelper::system().to_civil(instant)
}

/// Uses the host time zone at call time. See [`DateHelper::from_civil`].
pub fn from_civil(date: Option<&CivilDateTime>) -> Result<Option<LegacyInstant>> {
    DateHelper::system().from_civil(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};

    fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> CivilDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn date(y: i32, mo: u32, d: u32) -> CivilDate {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap()
    }

    #[test]
    fn test_format_date() {
        let value = datetime(2024, 3, 20, 10, 30, 0);
        assert_eq!(
            format(Some(&value), "yyyy-MM-dd HH:mm:ss").unwrap().as_deref(),
            Some("2024-03-20 10:30:00")
        );
    }

    #[test]
    fn test_format_absent_skips_pattern_check() {
        assert_eq!(format(None, "yyyy-MM-dd").unwrap(), None);
        assert_eq!(format(None, "qqqq").unwrap(), None);
        let value = datetime(2024, 3, 20, 10, 30, 0);
        assert!(matches!(
            format(Some(&value), "qqqq"),
            Err(DateHelperError::FormatError { .. })
        ));
    }

    #[test]
    fn test_parse_date() {
        let parsed = parse(Some("2024-03-20 10:30:00"), "yyyy-MM-dd HH:mm:ss")
            .unwrap()
            .unwrap();
        assert_eq!(parsed, datetime(2024, 3, 20, 10, 30, 0));
    }

    #[test]
    fn test_parse_blank_is_absent() {
        assert_eq!(parse(None, "yyyy-MM-dd").unwrap(), None);
        assert_eq!(parse(Some(""), "yyyy-MM-dd").unwrap(), None);
        assert_eq!(parse(Some("  \t"), "yyyy-MM-dd").unwrap(), None);
    }

    #[test]
    fn test_parse_does_not_trim() {
        assert!(matches!(
            parse(Some(" 2024-03-20 10:30:00"), "yyyy-MM-dd HH:mm:ss"),
            Err(DateHelperError::ParseError { .. })
        ));
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(date(2024, 3, 20), date(2024, 3, 25)), 5);
        assert_eq!(days_between(date(2024, 3, 25), date(2024, 3, 20)), -5);
        assert_eq!(days_between(date(2023, 1, 1), date(2024, 1, 1)), 365);
        assert_eq!(days_between(date(2024, 1, 1), date(2025, 1, 1)), 366);
    }

    #[test]
    fn test_add_days() {
        let value = datetime(2024, 3, 20, 10, 30, 0);
        assert_eq!(
            add_days(Some(value), 5).unwrap(),
            Some(datetime(2024, 3, 25, 10, 30, 0))
        );
        assert_eq!(
            add_days(Some(value), -5).unwrap(),
            Some(datetime(2024, 3, 15, 10, 30, 0))
        );
        assert_eq!(
            add_days(Some(datetime(2024, 2, 28, 8, 0, 0)), 1).unwrap(),
            Some(datetime(2024, 2, 29, 8, 0, 0))
        );
        assert_eq!(
            add_days(Some(datetime(2023, 12, 31, 23, 59, 59)), 1).unwrap(),
            Some(datetime(2024, 1, 1, 23, 59, 59))
        );
        assert_eq!(add_days(None, 1).unwrap(), None);
    }

    #[test]
    fn test_add_days_overflow_is_an_error() {
        let value = datetime(2024, 3, 20, 10, 30, 0);
        assert!(matches!(
            add_days(Some(value), i64::MAX),
            Err(DateHelperError::InvalidArgument { .. })
        ));
        assert!(matches!(
            add_days(Some(value), i64::MIN),
            Err(DateHelperError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_in_range() {
        let value = datetime(2024, 3, 20, 10, 30, 0);
        let start = datetime(2024, 3, 19, 0, 0, 0);
        let end = datetime(2024, 3, 21, 23, 59, 59);
        assert!(in_range(Some(&value), Some(&start), Some(&end)));
        assert!(!in_range(Some(&value), Some(&end), Some(&start)));
        assert!(in_range(Some(&start), Some(&start), Some(&end)));
        assert!(in_range(Some(&end), Some(&start), Some(&end)));
        assert!(!in_range(None, Some(&start), Some(&end)));
        assert!(!in_range(Some(&value), None, Some(&end)));
        assert!(!in_range(Some(&value), Some(&start), None));
    }

    #[test]
    fn test_start_and_end_of_day() {
        let value = NaiveDate::from_ymd_opt(2024, 3, 20)
            .unwrap()
            .and_hms_nano_opt(10, 30, 0, 500_000_000)
            .unwrap();
        assert_eq!(start_of_day(Some(value)), Some(datetime(2024, 3, 20, 0, 0, 0)));
        assert_eq!(end_of_day(Some(value)), Some(datetime(2024, 3, 20, 23, 59, 59)));
        assert_eq!(start_of_day(None), None);
        assert_eq!(end_of_day(None), None);
    }

    #[test]
    fn test_is_leap_year() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2020));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(2023));
        assert!(!is_leap_year(2100));
        assert!(!is_leap_year(1900));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 1).unwrap(), 31);
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2023, 2).unwrap(), 28);
        assert_eq!(days_in_month(2024, 3).unwrap(), 31);
        assert_eq!(days_in_month(2024, 4).unwrap(), 30);
        assert_eq!(days_in_month(2100, 2).unwrap(), 28);
        assert!(matches!(
            days_in_month(2024, 0),
            Err(DateHelperError::InvalidArgument { .. })
        ));
        assert!(matches!(
            days_in_month(2024, 13),
            Err(DateHelperError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_days_in_month_agrees_with_chrono() {
        for year in [1900, 2000, 2023, 2024] {
            for month in 1..=12 {
                let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
                let next = first.checked_add_months(chrono::Months::new(1)).unwrap();
                assert_eq!(
                    i64::from(days_in_month(year, month).unwrap()),
                    days_between(first, next)
                );
            }
        }
    }

    #[test]
    fn test_helper_with_fixed_clock_and_zone() {
        let at = DateTime::from_timestamp(1_710_930_600, 0).unwrap();
        let zone = LocalZone::Fixed(FixedOffset::east_opt(9 * 3600).unwrap());
        let helper = DateHelper::new(FixedClock::new(at), zone);

        assert_eq!(helper.now_datetime(), datetime(2024, 3, 20, 19, 30, 0));
        assert_eq!(helper.now_date(), date(2024, 3, 20));
        assert_eq!(helper.now_instant().epoch_millis(), 1_710_930_600_000);

        let instant = helper.now_instant();
        let civil = helper.to_civil(Some(instant)).unwrap();
        assert_eq!(helper.from_civil(Some(&civil)).unwrap(), Some(instant));
        assert_eq!(helper.to_civil(None), None);
        assert_eq!(helper.from_civil(None).unwrap(), None);
    }

    #[test]
    fn test_system_helpers_return_values() {
        assert!(now_datetime().year() >= 2024);
        assert!(now_date() >= date(2024, 1, 1));
        assert!(to_civil(Some(LegacyInstant::now())).is_some());
        assert!(from_civil(Some(&now_datetime())).unwrap().is_some());
    }
}
