pub mod board;
pub mod config;
pub mod countdown;
pub mod datetime;
pub mod error;
pub mod hijri;
pub mod paths;
pub mod poller;
pub mod schedule;
pub mod source;
pub mod time;
pub mod timeout;

pub use board::{DisplayState, Tick, DEFAULT_PREVIEW_LEAD_SECS};
pub use config::{
    ApiConfig, AudioConfig, DisplayConfig, DisplaySettings, LoggingConfig, ScheduleConfig,
    CONFIG_TEMPLATE,
};

/// Re-export toml error type for config parsing error handling
pub use toml::de::Error as TomlParseError;
pub use countdown::{countdown_phrase, countdown_text, event_display_name, target_display_name};
pub use error::CoreError;
pub use hijri::HijriDate;
pub use paths::{
    config_dir, log_file_path, theme_path, CONFIG_DIR_NAME, CONFIG_FILE_NAME, LOG_FILE_NAME,
    THEME_FILE_NAME,
};
pub use poller::{delay_until_next_day, ScheduleEvent, SchedulePoller};
pub use schedule::{ApiData, Event, Image, RawEvent, Schedule, Target};
pub use source::ScheduleSource;
pub use time::DurationExt;
pub use timeout::TimeoutSpec;
