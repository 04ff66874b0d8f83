pub mod date_helper;
pub mod pattern;
pub mod zone;

pub use crate::domain::model::{CivilDate, CivilDateTime, LegacyInstant, LocalZone};
pub use crate::domain::ports::{Clock, ConfigProvider};
pub use crate::utils::error::Result;
