//! User settings for Splitbook
//!
//! Manages user preferences: currency, date format, the default expense
//! category and the member commands act as when `--as` is not given.

use serde::{Deserialize, Serialize};

use super::paths::SplitbookPaths;
use crate::error::SplitbookError;

/// User settings for Splitbook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// ISO currency code recorded on new groups and settlements
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Currency symbol used for display
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Category assigned to expenses created without one
    #[serde(default = "default_category")]
    pub default_category: String,

    /// Member name or ID that commands act as when none is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_member: Option<String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_category() -> String {
    "general".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency: default_currency(),
            currency_symbol: default_currency_symbol(),
            date_format: default_date_format(),
            default_category: default_category(),
            default_member: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &SplitbookPaths) -> Result<Self, SplitbookError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                SplitbookError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                SplitbookError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SplitbookPaths) -> Result<(), SplitbookError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            SplitbookError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            SplitbookError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
