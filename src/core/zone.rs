use crate::domain::model::{CivilDateTime, LegacyInstant, LocalZone};
use crate::utils::error::{DateHelperError, Result};
use chrono::{DateTime, Local, LocalResult, Offset, TimeDelta, TimeZone, Utc};

impl LocalZone {
    pub fn to_civil(&self, instant: LegacyInstant) -> CivilDateTime {
        let utc = instant.as_datetime();
        match self {
            LocalZone::System => utc.with_timezone(&Local).naive_local(),
            LocalZone::Fixed(offset) => utc.with_timezone(offset).naive_local(),
        }
    }

    pub fn from_civil(&self, civil: &CivilDateTime) -> Result<LegacyInstant> {
        let utc = match self {
            LocalZone::System => resolve_local(&Local, civil)?,
            LocalZone::Fixed(offset) => resolve_local(offset, civil)?,
        };
        Ok(LegacyInstant::from_datetime(utc))
    }
}

/// Maps a wall-clock time to an instant. An ambiguous time (clocks turned
/// back) takes the earlier offset. A skipped time (clocks turned forward)
/// keeps the offset in force before the transition, which moves it later by
/// the length of the gap.
pub fn resolve_local<Tz: TimeZone>(zone: &Tz, civil: &CivilDateTime) -> Result<DateTime<Utc>> {
    match zone.from_local_datetime(civil) {
        LocalResult::Single(datetime) => Ok(datetime.with_timezone(&Utc)),
        LocalResult::Ambiguous(first, second) => {
            // chrono's Local orders the pair by offset, not by instant.
            Ok(first.with_timezone(&Utc).min(second.with_timezone(&Utc)))
        }
        LocalResult::None => {
            let before = civil
                .checked_sub_signed(TimeDelta::days(1))
                .and_then(|earlier| zone.from_local_datetime(&earlier).earliest())
                .ok_or_else(|| unrepresentable(civil))?;
            let offset = before.offset().fix();
            let utc = civil
                .checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))
                .ok_or_else(|| unrepresentable(civil))?
                .and_utc();
            tracing::debug!(
                "{} falls in a time zone gap, resolved with offset {}",
                civil,
                offset
            );
            Ok(utc)
        }
    }
}

fn unrepresentable(civil: &CivilDateTime) -> DateHelperError {
    DateHelperError::ConversionError {
        message: format!("{} cannot be mapped to an instant", civil),
    }
}
