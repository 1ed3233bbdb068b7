//! Theme file watching and hot-reload CSS injection.
//!
//! The embedded stylesheet is copied to the config directory on first run.
//! After that the file is watched and every save re-renders the `<style>`
//! element with the new content.

use dioxus::prelude::*;
use notify_debouncer_mini::notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

const LOG_TARGET: &str = "prayer_display::theme";

/// Errors that can occur during theme operations
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Failed to read theme file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to watch theme file: {0}")]
    WatcherError(#[from] notify_debouncer_mini::notify::Error),
}

/// Embedded default CSS (compiled into the binary)
const DEFAULT_CSS: &str = include_str!("../assets/default_theme.css");

/// Delay that folds an editor's burst of writes into one reload
const DEBOUNCE_MS: u64 = 300;

/// Read the theme file, creating it from the embedded stylesheet first if needed.
///
/// # Errors
///
/// Returns an error if the config directory cannot be created or the file
/// cannot be read or written.
pub fn initialize_theme() -> Result<String, ThemeError> {
    let theme_path = prayer_display_core::theme_path();

    if theme_path.exists() {
        info!(target: LOG_TARGET, "Loading theme from {:?}", theme_path);
        return Ok(fs::read_to_string(&theme_path)?);
    }

    info!(
        target: LOG_TARGET,
        "Theme file not found, creating from template at {:?}", theme_path
    );
    fs::create_dir_all(prayer_display_core::config_dir())?;
    fs::write(&theme_path, DEFAULT_CSS)?;

    Ok(DEFAULT_CSS.to_string())
}

/// Current theme file content, or the embedded stylesheet if it cannot be read.
#[must_use]
pub fn load_theme_css() -> String {
    match fs::read_to_string(prayer_display_core::theme_path()) {
        Ok(css) => css,
        Err(e) => {
            warn!(target: LOG_TARGET, "Failed to read theme file, using embedded CSS: {}", e);
            DEFAULT_CSS.to_string()
        }
    }
}

/// Dioxus hook providing the theme CSS, updated whenever the file changes.
#[must_use]
pub fn use_theme_watcher(cancel_token: CancellationToken) -> Signal<String> {
    let mut css_content = use_signal(|| {
        initialize_theme().unwrap_or_else(|e| {
            error!(target: LOG_TARGET, "Failed to initialize theme: {}", e);
            DEFAULT_CSS.to_string()
        })
    });

    use_future(move || {
        let cancel_token = cancel_token.clone();

        async move {
            let (tx, mut rx) = mpsc::channel::<()>(16);

            // Dropping the debouncer stops the watch
            let debouncer = match watch_theme_file(tx) {
                Ok(debouncer) => debouncer,
                Err(e) => {
                    error!(target: LOG_TARGET, "{}", e);
                    return;
                }
            };

            loop {
                tokio::select! {
                    () = cancel_token.cancelled() => {
                        info!(target: LOG_TARGET, "Theme watcher shutting down");
                        break;
                    }
                    Some(()) = rx.recv() => {
                        info!(target: LOG_TARGET, "Theme file changed, reloading CSS");
                        css_content.set(load_theme_css());
                    }
                }
            }

            drop(debouncer);
        }
    });

    css_content
}

/// Start watching the theme file; each debounced change sends on `tx`.
fn watch_theme_file(tx: mpsc::Sender<()>) -> Result<Debouncer<RecommendedWatcher>, ThemeError> {
    let theme_path = prayer_display_core::theme_path();
    let is_theme_file = |path: &Path| {
        path.file_name()
            .is_some_and(|name| name == prayer_display_core::THEME_FILE_NAME)
    };

    let mut debouncer = new_debouncer(
        Duration::from_millis(DEBOUNCE_MS),
        move |res: DebounceEventResult| match res {
            // The directory also holds the config and log files
            Ok(events) if events.iter().any(|event| is_theme_file(&event.path)) => {
                // Sync callback on the watcher thread
                let _ = tx.blocking_send(());
            }
            Ok(_) => {}
            Err(e) => warn!(target: LOG_TARGET, "Theme watcher error: {}", e),
        },
    )?;

    // Editors often replace the file, so watch its directory
    let watch_path = theme_path
        .parent()
        .map_or_else(|| theme_path.clone(), PathBuf::from);
    debouncer
        .watcher()
        .watch(&watch_path, RecursiveMode::NonRecursive)?;

    info!(target: LOG_TARGET, "Watching theme file for changes: {:?}", theme_path);
    Ok(debouncer)
}
