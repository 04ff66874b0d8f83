use crate::utils::error::DateHelperError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

/// Calendar date plus time-of-day, with no time zone attached.
pub type CivilDateTime = NaiveDateTime;

/// Calendar date without a time-of-day.
pub type CivilDate = NaiveDate;

/// An absolute point in time with millisecond precision, the resolution of an
/// epoch-millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LegacyInstant(DateTime<Utc>);

impl LegacyInstant {
    /// Sub-millisecond digits are truncated.
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime.trunc_subsecs(3))
    }

    pub fn from_epoch_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<SystemTime> for LegacyInstant {
    fn from(time: SystemTime) -> Self {
        Self::from_datetime(DateTime::<Utc>::from(time))
    }
}

impl From<LegacyInstant> for SystemTime {
    fn from(instant: LegacyInstant) -> Self {
        SystemTime::from(instant.0)
    }
}

impl fmt::Display for LegacyInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

/// The zone used to move between [`LegacyInstant`] and [`CivilDateTime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LocalZone {
    /// Whatever the host reports at call time.
    #[default]
    System,
    Fixed(FixedOffset),
}

impl FromStr for LocalZone {
    type Err = DateHelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        match value.to_ascii_lowercase().as_str() {
            "system" | "local" => return Ok(LocalZone::System),
            "z" | "utc" => {
                let utc = FixedOffset::east_opt(0).ok_or_else(|| invalid_zone(s))?;
                return Ok(LocalZone::Fixed(utc));
            }
            _ => {}
        }

        let (sign, digits) = match value.as_bytes().first() {
            Some(b'+') => (1, &value[1..]),
            Some(b'-') => (-1, &value[1..]),
            _ => return Err(invalid_zone(s)),
        };
        let digits = digits.replace(':', "");
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid_zone(s));
        }
        let (hours, minutes) = match digits.len() {
            2 => (&digits[..2], "0"),
            4 => (&digits[..2], &digits[2..]),
            _ => return Err(invalid_zone(s)),
        };
        let hours: i32 = hours.parse().map_err(|_| invalid_zone(s))?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid_zone(s))?;
        if hours > 18 || minutes > 59 {
            return Err(invalid_zone(s));
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(LocalZone::Fixed)
            .ok_or_else(|| invalid_zone(s))
    }
}

impl TryFrom<String> for LocalZone {
    type Error = DateHelperError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LocalZone> for String {
    fn from(zone: LocalZone) -> Self {
        zone.to_string()
    }
}

impl fmt::Display for LocalZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalZone::System => f.write_str("system"),
            LocalZone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

fn invalid_zone(value: &str) -> DateHelperError {
    DateHelperError::InvalidArgument {
        field: "zone".to_string(),
        value: value.to_string(),
        reason: "Expected 'system', 'UTC' or an offset such as +08:00".to_string(),
    }
}
