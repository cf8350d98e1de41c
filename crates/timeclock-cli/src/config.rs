//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the time log.
    pub log_file: PathBuf,

    /// Path to the list of known codes.
    pub code_file: PathBuf,

    /// New event times are rounded to this many minutes. 0 or 1 disables rounding.
    pub round_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let config_dir = dirs_config_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            log_file: data_dir.join("timeclock.log"),
            code_file: config_dir.join("codes.txt"),
            round_minutes: 6,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
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

        // Load from environment variables (TIMECLOCK_*)
        figment = figment.merge(Env::prefixed("TIMECLOCK_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for timeclock.
///
/// On Linux: `~/.config/timeclock`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("timeclock"))
}

/// Returns the platform-specific data directory for timeclock.
///
/// On Linux: `~/.local/share/timeclock`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("timeclock"))
}
