use crate::config::cli::{Command, Settings};
use crate::core::date_helper::{self, DateHelper};
use crate::domain::model::{CivilDateTime, LegacyInstant};
use crate::domain::ports::{Clock, ConfigProvider};
use crate::utils::error::{DateHelperError, Result};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    pub command: &'static str,
    pub result: Value,
}

impl CommandOutput {
    fn new(command: &'static str, result: impl Into<Value>) -> Self {
        Self {
            command,
            result: result.into(),
        }
    }

    fn optional(command: &'static str, result: Option<String>) -> Self {
        Self::new(command, result.map(Value::String).unwrap_or(Value::Null))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Value::String(s) => f.write_str(s),
            Value::Null => f.write_str("(none)"),
            other => write!(f, "{}", other),
        }
    }
}

pub fn run<C: Clock>(
    command: &Command,
    settings: &Settings,
    helper: &DateHelper<C>,
) -> Result<CommandOutput> {
    tracing::debug!("Running {:?} with zone {}", command, helper.zone());

    let output = match command {
        Command::Now { date_only: true } => {
            let today = helper.now_date().and_time(chrono::NaiveTime::MIN);
            let text = date_helper::format(Some(&today), settings.date_pattern())?;
            CommandOutput::optional("now", text)
        }
        Command::Now { date_only: false } => {
            let now = helper.now_datetime();
            let text = date_helper::format(Some(&now), settings.pattern())?;
            CommandOutput::optional("now", text)
        }
        Command::Format { datetime } => {
            let text = date_helper::format(Some(datetime), settings.pattern())?;
            CommandOutput::optional("format", text)
        }
        Command::Parse { text } => {
            let parsed = date_helper::parse(Some(text), settings.pattern())?;
            CommandOutput::optional("parse", parsed.map(|p| iso(&p)))
        }
        Command::Between { from, to } => {
            CommandOutput::new("between", date_helper::days_between(*from, *to))
        }
        Command::AddDays { datetime, days } => {
            let shifted = date_helper::add_days(Some(*datetime), *days)?;
            CommandOutput::optional("add-days", shifted.map(|d| iso(&d)))
        }
        Command::InRange {
            datetime,
            start,
            end,
        } => CommandOutput::new(
            "in-range",
            date_helper::in_range(Some(datetime), Some(start), Some(end)),
        ),
        Command::StartOfDay { datetime } => CommandOutput::optional(
            "start-of-day",
            date_helper::start_of_day(Some(*datetime)).map(|d| iso(&d)),
        ),
        Command::EndOfDay { datetime } => CommandOutput::optional(
            "end-of-day",
            date_helper::end_of_day(Some(*datetime)).map(|d| iso(&d)),
        ),
        Command::LeapYear { year } => {
            CommandOutput::new("leap-year", date_helper::is_leap_year(*year))
        }
        Command::DaysInMonth { year, month } => {
            let days = date_helper::days_in_month(*year, *month)?;
            CommandOutput::new("days-in-month", days)
        }
        Command::ToCivil { epoch_millis } => {
            let instant = LegacyInstant::from_epoch_millis(*epoch_millis).ok_or_else(|| {
                DateHelperError::InvalidArgument {
                    field: "epoch_millis".to_string(),
                    value: epoch_millis.to_string(),
                    reason: "Outside the supported instant range".to_string(),
                }
            })?;
            let civil = helper.to_civil(Some(instant));
            CommandOutput::optional("to-civil", civil.map(|d| iso(&d)))
        }
        Command::FromCivil { datetime } => {
            let instant = helper.from_civil(Some(datetime))?;
            CommandOutput::new("from-civil", instant.map(|i| i.epoch_millis()))
        }
    };

    Ok(output)
}

fn iso(datetime: &CivilDateTime) -> String {
    datetime.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}
