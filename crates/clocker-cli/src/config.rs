//! Configuration loading and management.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clocker_core::ComplianceSettings;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Region passed to the holiday lookup.
    pub region: String,

    /// Working-time rules.
    pub compliance: ComplianceSettings,

    /// Public holidays per region.
    #[serde(default)]
    pub holidays: BTreeMap<String, Vec<NaiveDate>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: "BW".to_string(),
            compliance: ComplianceSettings::default(),
            holidays: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Loads configuration from default locations, optionally layering a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (CLOCKER_*, nested keys split on __)
        figment = figment.merge(Env::prefixed("CLOCKER_").split("__"));

        figment.extract()
    }

    /// Whether `date` is a configured public holiday in `region`.
    pub fn is_holiday(&self, date: NaiveDate, region: &str) -> bool {
        self.holidays
            .get(region)
            .is_some_and(|dates| dates.contains(&date))
    }
}

/// Returns the platform-specific config directory for clocker.
///
/// On Linux: `~/.config/clocker`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("clocker"))
}
