use crate::core::date_helper::{DEFAULT_DATE_PATTERN, DEFAULT_PATTERN};
use crate::core::pattern::DatePattern;
use crate::domain::model::LocalZone;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{DateHelperError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    pub zone: Option<ZoneConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_pattern")]
    pub pattern: String,
    #[serde(default = "default_date_pattern")]
    pub date_pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub offset: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            date_pattern: default_date_pattern(),
        }
    }
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

fn default_date_pattern() -> String {
    DEFAULT_DATE_PATTERN.to_string()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        tracing::debug!("Loaded configuration from {}", path.as_ref().display());
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DateHelperError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATE_HELPER_ZONE})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DateHelperError::ConfigError {
            message: format!("Invalid substitution expression: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("defaults.pattern", &self.defaults.pattern)?;
        validate_non_empty_string("defaults.date_pattern", &self.defaults.date_pattern)?;
        DatePattern::compile(&self.defaults.pattern)?;
        DatePattern::compile(&self.defaults.date_pattern)?;
        self.local_zone()?;
        Ok(())
    }

    /// `system` when no `[zone]` table is present.
    pub fn local_zone(&self) -> Result<LocalZone> {
        match &self.zone {
            Some(zone) => zone.offset.parse(),
            None => Ok(LocalZone::System),
        }
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn pattern(&self) -> &str {
        &self.defaults.pattern
    }

    fn date_pattern(&self) -> &str {
        &self.defaults.date_pattern
    }

    fn zone(&self) -> Result<LocalZone> {
        self.local_zone()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
