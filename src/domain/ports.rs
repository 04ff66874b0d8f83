use crate::domain::model::LocalZone;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub trait ConfigProvider: Send + Sync {
    fn pattern(&self) -> &str;
    fn date_pattern(&self) -> &str;
    fn zone(&self) -> Result<LocalZone>;
}
