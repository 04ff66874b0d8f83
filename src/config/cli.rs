use crate::config::toml_config::TomlConfig;
use crate::core::date_helper::{DEFAULT_DATE_PATTERN, DEFAULT_PATTERN};
use crate::core::pattern::DatePattern;
use crate::domain::model::{CivilDate, CivilDateTime, LocalZone};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, Validate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "date-helper")]
#[command(about = "Date and time helpers: formatting, parsing and calendar arithmetic")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Time zone for now/to-civil/from-civil: "system", "UTC" or an offset like +08:00
    #[arg(long, global = true)]
    pub zone: Option<String>,

    /// Pattern for format/parse, e.g. "yyyy-MM-dd HH:mm:ss"
    #[arg(short, long, global = true)]
    pub pattern: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Print results as JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Datetime arguments use ISO form, e.g. 2024-03-20T10:30:00.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Current local datetime
    Now {
        #[arg(long)]
        date_only: bool,
    },
    /// Render a datetime with the pattern
    Format { datetime: CivilDateTime },
    /// Parse text strictly with the pattern
    Parse { text: String },
    /// Signed day count from one date to another
    Between { from: CivilDate, to: CivilDate },
    /// Shift a datetime by whole days
    AddDays {
        datetime: CivilDateTime,
        #[arg(allow_negative_numbers = true)]
        days: i64,
    },
    /// Inclusive range check
    InRange {
        datetime: CivilDateTime,
        start: CivilDateTime,
        end: CivilDateTime,
    },
    StartOfDay { datetime: CivilDateTime },
    EndOfDay { datetime: CivilDateTime },
    LeapYear {
        #[arg(allow_negative_numbers = true)]
        year: i32,
    },
    DaysInMonth {
        #[arg(allow_negative_numbers = true)]
        year: i32,
        month: u32,
    },
    /// Epoch milliseconds to local datetime
    ToCivil {
        #[arg(allow_negative_numbers = true)]
        epoch_millis: i64,
    },
    /// Local datetime to epoch milliseconds
    FromCivil { datetime: CivilDateTime },
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(pattern) = &self.pattern {
            validate_non_empty_string("pattern", pattern)?;
            DatePattern::compile(pattern)?;
        }
        if let Some(zone) = &self.zone {
            zone.parse::<LocalZone>()?;
        }
        Ok(())
    }
}

/// Effective settings: CLI flags over the config file over built-in defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub pattern: String,
    pub date_pattern: String,
    pub zone: LocalZone,
    pub verbose: bool,
    pub json_logs: bool,
}

impl Settings {
    pub fn resolve(cli: &CliConfig, file: Option<&TomlConfig>) -> Result<Self> {
        let defaults = file.map(|f| f.defaults.clone()).unwrap_or_default();

        let zone = match (&cli.zone, file) {
            (Some(zone), _) => zone.parse()?,
            (None, Some(file)) => file.local_zone()?,
            (None, None) => LocalZone::System,
        };

        Ok(Self {
            pattern: cli.pattern.clone().unwrap_or(defaults.pattern),
            date_pattern: defaults.date_pattern,
            zone,
            verbose: cli.verbose || file.is_some_and(|f| f.verbose()),
            json_logs: file.is_some_and(|f| f.json_logs()),
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            date_pattern: DEFAULT_DATE_PATTERN.to_string(),
            zone: LocalZone::System,
            verbose: false,
            json_logs: false,
        }
    }
}

impl ConfigProvider for Settings {
    fn pattern(&self) -> &str {
        &self.pattern
    }

    fn date_pattern(&self) -> &str {
        &self.date_pattern
    }

    fn zone(&self) -> Result<LocalZone> {
        Ok(self.zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_parse_subcommands() {
        let cli = CliConfig::try_parse_from([
            "date-helper",
            "add-days",
            "2024-03-20T10:30:00",
            "-5",
            "--zone",
            "+08:00",
        ])
        .unwrap();
        assert_eq!(cli.zone.as_deref(), Some("+08:00"));
        match cli.command {
            Command::AddDays { datetime, days } => {
                assert_eq!(datetime.to_string(), "2024-03-20 10:30:00");
                assert_eq!(days, -5);
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(CliConfig::try_parse_from(["date-helper", "format", "not-a-date"]).is_err());
    }

    #[test]
    fn test_cli_validation() {
        let cli =
            CliConfig::try_parse_from(["date-helper", "--pattern", "yyyy-qq", "now"]).unwrap();
        assert!(cli.validate().is_err());

        let cli =
            CliConfig::try_parse_from(["date-helper", "--zone", "nowhere", "now"]).unwrap();
        assert!(cli.validate().is_err());

        let cli =
            CliConfig::try_parse_from(["date-helper", "-p", "dd.MM.yyyy HH:mm", "now"]).unwrap();
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_settings_precedence() {
        let file = TomlConfig::from_toml_str(
            r#"
[defaults]
pattern = "dd/MM/yyyy HH:mm:ss"
date_pattern = "dd/MM/yyyy"

[zone]
offset = "+02:00"
"#,
        )
        .unwrap();

        let cli = CliConfig::try_parse_from(["date-helper", "now"]).unwrap();
        let settings = Settings::resolve(&cli, Some(&file)).unwrap();
        assert_eq!(settings.pattern, "dd/MM/yyyy HH:mm:ss");
        assert_eq!(settings.date_pattern, "dd/MM/yyyy");
        assert_eq!(
            settings.zone,
            LocalZone::Fixed(FixedOffset::east_opt(2 * 3600).unwrap())
        );

        let cli = CliConfig::try_parse_from([
            "date-helper",
            "--zone",
            "UTC",
            "--pattern",
            "yyyy",
            "now",
        ])
        .unwrap();
        let settings = Settings::resolve(&cli, Some(&file)).unwrap();
        assert_eq!(settings.pattern, "yyyy");
        assert_eq!(settings.zone, LocalZone::Fixed(FixedOffset::east_opt(0).unwrap()));

        let settings = Settings::resolve(&cli, None).unwrap();
        assert_eq!(settings.date_pattern, DEFAULT_DATE_PATTERN);
    }
}
