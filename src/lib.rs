pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command, Settings};
pub use config::TomlConfig;

pub use adapters::{FixedClock, SystemClock};
pub use crate::core::date_helper::{
    add_days, days_between, days_in_month, end_of_day, format, from_civil, in_range,
    is_leap_year, now_date, now_datetime, parse, start_of_day, to_civil, DateHelper,
    DEFAULT_DATE_PATTERN, DEFAULT_PATTERN,
};
pub use crate::core::pattern::DatePattern;
pub use domain::model::{CivilDate, CivilDateTime, LegacyInstant, LocalZone};
pub use domain::ports::{Clock, ConfigProvider};
pub use utils::error::{DateHelperError, Result};
