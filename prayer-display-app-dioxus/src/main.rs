#![cfg_attr(feature = "bundle", windows_subsystem = "windows")]
mod app;
mod bridge;
mod components;
mod cue;
mod state;
mod theme_watcher;

use crate::app::App;
use crate::bridge::{use_clock, use_image_rotation, use_schedule_bridge};
use crate::cue::CuePlayer;
use crate::state::DisplayBoard;
use dioxus::desktop::tao::window::Fullscreen;
use dioxus::desktop::{LogicalSize, WindowBuilder};
use dioxus::prelude::*;
use prayer_display_api::HttpScheduleSource;
use prayer_display_core::{
    CoreError, DisplayConfig, DisplaySettings, ScheduleEvent, SchedulePoller, TomlParseError,
    CONFIG_TEMPLATE,
};
use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const APP_NAME: &str = "Prayer Display";

fn main() {
    // Check config for logging.enabled before full config load
    let file_logging_enabled = check_file_logging_enabled();
    init_tracing(file_logging_enabled);

    // Load config or create template on first run
    let config = match DisplayConfig::load_or_create() {
        Ok(config) => config,
        Err(CoreError::ConfigNotFound { path }) => {
            show_new_config_dialog(&path);
            std::process::exit(0);
        }
        Err(CoreError::ConfigParseError(parse_error)) => {
            show_config_parse_error_dialog(&parse_error, &DisplayConfig::config_path());
            std::process::exit(1);
        }
        Err(e @ (CoreError::ConfigMissingField { .. } | CoreError::ConfigInvalid { .. })) => {
            show_config_error_dialog(&e, &DisplayConfig::config_path());
            std::process::exit(1);
        }
        Err(e) => {
            error!("{e}");
            show_generic_error_dialog(&e.to_string());
            std::process::exit(1);
        }
    };

    info!("Loaded config, schedule from {}", config.api.base_url);

    let source = match HttpScheduleSource::new(&config.api) {
        Ok(source) => source,
        Err(e) => {
            error!("Failed to create schedule source: {e}");
            show_generic_error_dialog(&e.to_string());
            std::process::exit(1);
        }
    };

    // Create tokio runtime for background tasks
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    // Create shared cancellation token for graceful shutdown
    let cancel_token = CancellationToken::new();

    // Set up Ctrl+C handler to trigger graceful shutdown
    let ctrlc_token = cancel_token.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received Ctrl+C, shutting down gracefully...");
        ctrlc_token.cancel();
    }) {
        error!("Failed to set Ctrl+C handler: {}", e);
    }

    let poller = Arc::new(SchedulePoller::new(
        Box::new(source),
        &config.schedule,
        Some(cancel_token.clone()),
    ));

    // Spawn background tasks
    runtime.spawn(start_schedule_poller(Arc::clone(&poller)));
    runtime.spawn(log_schedule_events(Arc::clone(&poller)));

    let cue = CuePlayer::from_config(&config);

    let window = WindowBuilder::new()
        .with_title(APP_NAME)
        .with_decorations(!config.display.fullscreen)
        .with_resizable(true)
        .with_inner_size(LogicalSize::new(1280.0, 720.0));

    let window = if config.display.fullscreen {
        info!("Starting in borderless fullscreen");
        window.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        window
    };

    let dioxus_config = dioxus::desktop::Config::default()
        .with_window(window)
        .with_disable_context_menu(true);

    // Launch Dioxus application
    // Use with_context to inject the poller, display settings, cue and cancellation token
    dioxus::LaunchBuilder::desktop()
        .with_cfg(dioxus_config)
        .with_context(poller)
        .with_context(config.display)
        .with_context(cue)
        .with_context(cancel_token)
        .launch(app);
}

/// Root component that sets up context and renders the app
fn app() -> Element {
    let settings: DisplaySettings = use_context();
    let board = use_context_provider(|| DisplayBoard::new(&settings));

    // Get the poller from context (injected via with_context)
    let poller: Arc<SchedulePoller> = use_context();
    let cue: CuePlayer = use_context();

    // Drive the board from timers and schedule events
    use_clock(board, cue, settings.tick_interval());
    use_image_rotation(board, settings.image_interval());
    use_schedule_bridge(poller, board);

    rsx! {
        document::Title { "{APP_NAME}" },
        App {}
    }
}

/// Show a native OS dialog for missing or invalid configuration values
fn show_config_error_dialog(error: &CoreError, config_path: &Path) {
    let message = format!(
        "{error}\n\nPlease edit the configuration file and restart the display.\n\n\
        The schedule server address is set with api.base_url."
    );

    let result = MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Prayer Display - Configuration Required")
        .set_description(&message)
        .set_buttons(MessageButtons::OkCancelCustom(
            "Open Config".into(),
            "Exit".into(),
        ))
        .show();

    open_config_if_chosen(&result, config_path);
}

/// Show dialog when config is newly created
fn show_new_config_dialog(config_path: &Path) {
    let message = "A configuration file has been created.\n\n\
        Please check the schedule server address:\n\
        \u{2022} api.base_url\n\n\
        then start the display again.";

    let result = MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title("Prayer Display - Configuration Created")
        .set_description(message)
        .set_buttons(MessageButtons::OkCancelCustom(
            "Open Config".into(),
            "Exit".into(),
        ))
        .show();

    open_config_if_chosen(&result, config_path);
}

/// Open the config file in the default editor when "Open Config" was pressed
fn open_config_if_chosen(result: &MessageDialogResult, config_path: &Path) {
    if matches!(result, MessageDialogResult::Custom(s) if s == "Open Config") {
        if let Err(e) = open::that(config_path) {
            error!("Failed to open config file: {e}");
        }
    }
}

/// Show dialog when config file has TOML parsing errors
fn show_config_parse_error_dialog(parse_error: &TomlParseError, config_path: &Path) {
    let message = format!(
        "Your configuration file has a syntax error and cannot be loaded.\n\n\
        Error: {parse_error}\n\n\
        You can either:\n\
        \u{2022} Open the config file and fix the syntax error\n\
        \u{2022} Reset to a fresh configuration template"
    );

    let result = MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Prayer Display - Configuration Error")
        .set_description(&message)
        .set_buttons(MessageButtons::OkCancelCustom(
            "Open Config".into(),
            "Reset Config".into(),
        ))
        .show();

    match result {
        MessageDialogResult::Custom(ref button) if button == "Reset Config" => {
            if let Err(e) = std::fs::write(config_path, CONFIG_TEMPLATE) {
                error!("Failed to reset config file: {e}");
                MessageDialog::new()
                    .set_level(MessageLevel::Error)
                    .set_title("Prayer Display - Reset Failed")
                    .set_description(format!("Failed to reset configuration:\n{e}"))
                    .set_buttons(MessageButtons::Ok)
                    .show();
            } else {
                MessageDialog::new()
                    .set_level(MessageLevel::Info)
                    .set_title("Prayer Display - Configuration Reset")
                    .set_description(
                        "Configuration has been reset to the default template.\n\n\
                        Please check the server address and restart the display.",
                    )
                    .set_buttons(MessageButtons::Ok)
                    .show();
                if let Err(e) = open::that(config_path) {
                    error!("Failed to open config file: {e}");
                }
            }
        }
        other => open_config_if_chosen(&other, config_path),
    }
}

/// Show a generic error dialog for unexpected errors
fn show_generic_error_dialog(error_message: &str) {
    let message = format!(
        "An unexpected error occurred:\n\n{error_message}\n\n\
        Please check your configuration file."
    );

    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Prayer Display - Error")
        .set_description(&message)
        .set_buttons(MessageButtons::Ok)
        .show();
}

/// Start the schedule poller to fetch the daily schedule
async fn start_schedule_poller(poller: Arc<SchedulePoller>) {
    info!("Starting schedule poller...");
    let handle = poller.start();
    let _ = handle.await;
}

/// Log all schedule events to the console
async fn log_schedule_events(poller: Arc<SchedulePoller>) {
    let mut rx = poller.subscribe();

    loop {
        match rx.recv().await {
            Ok(ScheduleEvent::Loaded { schedule }) => {
                info!(
                    "Schedule loaded: {} events, {} targets, {} images",
                    schedule.events.len(),
                    schedule.targets.len(),
                    schedule.images.len()
                );
            }
            Ok(ScheduleEvent::FetchFailed { message, retry_in }) => match retry_in {
                Some(retry) => warn!("Schedule fetch failed ({message}), retrying in {retry:?}"),
                None => error!("Schedule fetch failed ({message}), not retrying"),
            },
            Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                info!("Schedule event channel closed");
                break;
            }
            Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                info!("Missed {} schedule events", n);
            }
        }
    }
}

/// Check if file logging is enabled by reading the config file.
/// This is done before full config loading to set up tracing first.
/// Returns `false` if config doesn't exist or can't be parsed.
fn check_file_logging_enabled() -> bool {
    // Minimal structs to parse just the logging.enabled field
    #[derive(serde::Deserialize)]
    struct PartialConfig {
        #[serde(default)]
        logging: PartialLoggingConfig,
    }
    #[derive(serde::Deserialize, Default)]
    struct PartialLoggingConfig {
        #[serde(default)]
        enabled: bool,
    }

    let config_path = DisplayConfig::config_path();
    let Ok(content) = std::fs::read_to_string(&config_path) else {
        return false;
    };

    toml::from_str::<PartialConfig>(&content)
        .map(|c| c.logging.enabled)
        .unwrap_or(false)
}

/// Initialize tracing with console output and optional file logging
fn init_tracing(file_logging_enabled: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer();

    if file_logging_enabled {
        let log_path = prayer_display_core::log_file_path();

        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        match File::create(&log_path) {
            Ok(file) => {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt_layer)
                    .with(file_layer)
                    .init();

                return;
            }
            Err(e) => {
                eprintln!("Failed to create log file at {}: {e}", log_path.display());
            }
        }
    }

    // Fallback: console only
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
