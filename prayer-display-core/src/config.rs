use crate::error::{CoreError, Result};
use crate::timeout::TimeoutSpec;
use const_format::concatcp;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Default address of the schedule API
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9001";

/// Default path of the schedule endpoint
pub const DEFAULT_DATA_PATH: &str = "/api/data";

/// Default path of the transition cue sound
pub const DEFAULT_CUE_PATH: &str = "/res/beep.wav";

const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_REFRESH_OFFSET_SECS: u64 = 60;
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 300;
const DEFAULT_IMAGE_INTERVAL_SECS: u64 = 20;
const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
const DEFAULT_PREVIEW_LEAD_SECS: i64 = crate::board::DEFAULT_PREVIEW_LEAD_SECS;

/// Upper bound for offsets measured in seconds within a day
const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where and how the schedule is fetched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_data_path")]
    pub data_path: String,
    /// Millisecond count or shorthand such as "30s", "1m", "1H"; 0 disables it
    #[serde(default)]
    pub timeout: TimeoutSpec,
    /// Retries for transient network failures within one fetch
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_data_path() -> String {
    DEFAULT_DATA_PATH.to_string()
}

const fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            data_path: default_data_path(),
            timeout: TimeoutSpec::default(),
            max_retries: default_max_retries(),
        }
    }
}

impl ApiConfig {
    /// Parsed base URL of the API.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid absolute URL.
    pub fn base_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.base_url)?)
    }

    /// Absolute URL of the schedule endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or data path is invalid.
    pub fn data_url(&self) -> Result<Url> {
        Ok(self.base_url()?.join(&self.data_path)?)
    }
}

/// When the schedule is refreshed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds after local midnight to fetch the next day's schedule
    #[serde(default = "default_refresh_offset")]
    pub refresh_offset_secs: u64,
    /// Seconds to wait before retrying a failed fetch; 0 gives up after a failure
    #[serde(default = "default_retry_interval")]
    pub retry_interval_secs: u64,
}

const fn default_refresh_offset() -> u64 {
    DEFAULT_REFRESH_OFFSET_SECS
}

const fn default_retry_interval() -> u64 {
    DEFAULT_RETRY_INTERVAL_SECS
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            refresh_offset_secs: default_refresh_offset(),
            retry_interval_secs: default_retry_interval(),
        }
    }
}

impl ScheduleConfig {
    #[must_use]
    pub const fn refresh_offset(&self) -> Duration {
        Duration::from_secs(self.refresh_offset_secs)
    }

    /// Delay before retrying a failed fetch, `None` when retrying is off.
    #[must_use]
    pub const fn retry_interval(&self) -> Option<Duration> {
        if self.retry_interval_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.retry_interval_secs))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_image_interval")]
    pub image_interval_secs: u64,
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_true")]
    pub fullscreen: bool,
    /// Seconds before an event that a clicked preview starts at
    #[serde(default = "default_preview_lead")]
    pub preview_lead_secs: i64,
}

const fn default_image_interval() -> u64 {
    DEFAULT_IMAGE_INTERVAL_SECS
}

const fn default_tick_interval() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

const fn default_true() -> bool {
    true
}

const fn default_preview_lead() -> i64 {
    DEFAULT_PREVIEW_LEAD_SECS
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            image_interval_secs: default_image_interval(),
            tick_interval_ms: default_tick_interval(),
            fullscreen: true,
            preview_lead_secs: default_preview_lead(),
        }
    }
}

impl DisplaySettings {
    #[must_use]
    pub const fn image_interval(&self) -> Duration {
        Duration::from_secs(self.image_interval_secs)
    }

    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Resolved against `api.base_url` when relative
    #[serde(default = "default_cue_path")]
    pub cue_path: String,
}

fn default_cue_path() -> String {
    DEFAULT_CUE_PATH.to_string()
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cue_path: default_cue_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write logs to ~/.config/prayer-display/prayer-display.log
    #[serde(default)]
    pub enabled: bool,
}

impl DisplayConfig {
    /// Get the config file path (~/.config/prayer-display/config.toml)
    #[must_use]
    pub fn config_path() -> PathBuf {
        crate::paths::config_path()
    }

    /// Load config from file or create template on first run
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigNotFound`] after writing a template on first run,
    /// or an error if the file cannot be read, parsed, or validated.
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            // Create config directory if it doesn't exist
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }

            // Write template config
            fs::write(&config_path, CONFIG_TEMPLATE)?;

            return Err(CoreError::ConfigNotFound { path: config_path });
        }

        let content = fs::read_to_string(&config_path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate config file contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a field is missing or invalid.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check fields that serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns the first missing or invalid field found.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(CoreError::ConfigMissingField {
                field: "api.base_url".to_string(),
            });
        }
        if let Err(e) = self.api.data_url() {
            return Err(CoreError::ConfigInvalid {
                message: format!("api.base_url / api.data_path: {e}"),
            });
        }
        if self.display.image_interval_secs == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "display.image_interval_secs must be greater than 0".to_string(),
            });
        }
        if self.display.tick_interval_ms == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "display.tick_interval_ms must be greater than 0".to_string(),
            });
        }
        if self.display.preview_lead_secs < 0 {
            return Err(CoreError::ConfigInvalid {
                message: "display.preview_lead_secs must not be negative".to_string(),
            });
        }
        if self.display.preview_lead_secs.unsigned_abs() > SECS_PER_DAY {
            return Err(CoreError::ConfigInvalid {
                message: format!("display.preview_lead_secs must be at most {SECS_PER_DAY}"),
            });
        }
        if self.schedule.refresh_offset_secs > SECS_PER_DAY {
            return Err(CoreError::ConfigInvalid {
                message: format!("schedule.refresh_offset_secs must be at most {SECS_PER_DAY}"),
            });
        }
        Ok(())
    }

    /// Absolute URL of the transition cue sound.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or cue path is invalid.
    pub fn cue_url(&self) -> Result<Url> {
        Ok(self.api.base_url()?.join(&self.audio.cue_path)?)
    }
}

/// Template written on first run
pub const CONFIG_TEMPLATE: &str = concatcp!(
    r#"# Prayer Display Configuration
# ~/.config/prayer-display/config.toml

[api]
# Address of the server providing the daily schedule and images
base_url = ""#,
    DEFAULT_BASE_URL,
    r#""
data_path = ""#,
    DEFAULT_DATA_PATH,
    r#""
# Request deadline: milliseconds, or a number with unit ms, s, m, H ("0" disables it)
timeout = "1m"
# Retries for transient network failures within one fetch
max_retries = "#,
    DEFAULT_MAX_RETRIES,
    r#"

[schedule]
# The next day's schedule is fetched this many seconds after midnight
refresh_offset_secs = "#,
    DEFAULT_REFRESH_OFFSET_SECS,
    r#"
# Retry a failed fetch after this many seconds (0 = wait for a restart)
retry_interval_secs = "#,
    DEFAULT_RETRY_INTERVAL_SECS,
    r#"

[display]
image_interval_secs = "#,
    DEFAULT_IMAGE_INTERVAL_SECS,
    r#"
tick_interval_ms = "#,
    DEFAULT_TICK_INTERVAL_MS,
    r#"
fullscreen = true
# Clicking an event previews it starting this many seconds before it
preview_lead_secs = "#,
    DEFAULT_PREVIEW_LEAD_SECS,
    r#"

[audio]
enabled = true
# Sound played when the countdown moves to the next target
cue_path = ""#,
    DEFAULT_CUE_PATH,
    r#""

[logging]
# Also write logs to ~/.config/prayer-display/prayer-display.log
enabled = false
"#
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_to_defaults() {
        let config = DisplayConfig::from_toml_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.data_path, DEFAULT_DATA_PATH);
        assert_eq!(config.api.timeout.duration(), Some(Duration::from_secs(60)));
        assert_eq!(config.api.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.schedule.refresh_offset(), Duration::from_secs(60));
        assert_eq!(
            config.schedule.retry_interval(),
            Some(Duration::from_secs(300))
        );
        assert_eq!(config.display.image_interval(), Duration::from_secs(20));
        assert_eq!(config.display.tick_interval(), Duration::from_secs(1));
        assert!(config.display.fullscreen);
        assert!(config.audio.enabled);
        assert!(!config.logging.enabled);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = DisplayConfig::from_toml_str("").unwrap();
        assert_eq!(
            config.api.data_url().unwrap().as_str(),
            "http://127.0.0.1:9001/api/data"
        );
        assert_eq!(
            config.cue_url().unwrap().as_str(),
            "http://127.0.0.1:9001/res/beep.wav"
        );
    }

    #[test]
    fn test_partial_sections() {
        let config = DisplayConfig::from_toml_str(
            r#"
[api]
base_url = "http://display.local:8080/board/"
timeout = 15000

[schedule]
retry_interval_secs = 0
"#,
        )
        .unwrap();
        assert_eq!(
            config.api.data_url().unwrap().as_str(),
            "http://display.local:8080/api/data"
        );
        assert_eq!(config.api.timeout.duration(), Some(Duration::from_secs(15)));
        assert_eq!(config.schedule.retry_interval(), None);
        assert_eq!(config.schedule.refresh_offset_secs, 60);
    }

    #[test]
    fn test_missing_base_url() {
        let result = DisplayConfig::from_toml_str("[api]\nbase_url = \"\"\n");
        assert!(matches!(
            result,
            Err(CoreError::ConfigMissingField { ref field }) if field == "api.base_url"
        ));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            DisplayConfig::from_toml_str("[api]\nbase_url = \"not a url\"\n"),
            Err(CoreError::ConfigInvalid { .. })
        ));
        assert!(matches!(
            DisplayConfig::from_toml_str("[display]\nimage_interval_secs = 0\n"),
            Err(CoreError::ConfigInvalid { .. })
        ));
        assert!(matches!(
            DisplayConfig::from_toml_str("[api]\ntimeout = \"5 days\"\n"),
            Err(CoreError::ConfigParseError(_))
        ));
    }

    #[test]
    fn test_offsets_bounded_to_a_day() {
        assert!(DisplayConfig::from_toml_str("[display]\npreview_lead_secs = 86400\n").is_ok());
        assert!(matches!(
            DisplayConfig::from_toml_str("[display]\npreview_lead_secs = 10000000000000\n"),
            Err(CoreError::ConfigInvalid { ref message }) if message.contains("preview_lead_secs")
        ));
        assert!(matches!(
            DisplayConfig::from_toml_str("[schedule]\nrefresh_offset_secs = 9000000000000\n"),
            Err(CoreError::ConfigInvalid { ref message }) if message.contains("refresh_offset_secs")
        ));
    }
}
