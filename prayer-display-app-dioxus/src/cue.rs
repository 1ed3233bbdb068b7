//! Audible cue played when the countdown moves to the next target.

use dioxus::prelude::*;
use prayer_display_core::DisplayConfig;
use tracing::{debug, info, warn};

const LOG_TARGET: &str = "prayer_display::cue";

/// Plays the transition sound through the webview's audio element.
#[derive(Debug, Clone, Default)]
pub struct CuePlayer {
    url: Option<String>,
}

impl CuePlayer {
    /// Resolve the cue URL from config. Disabled audio or a bad URL yields a
    /// silent player.
    #[must_use]
    pub fn from_config(config: &DisplayConfig) -> Self {
        if !config.audio.enabled {
            info!(target: LOG_TARGET, "Audio cue disabled");
            return Self::default();
        }

        match config.cue_url() {
            Ok(url) => {
                info!(target: LOG_TARGET, "Audio cue: {}", url);
                Self {
                    url: Some(url.into()),
                }
            }
            Err(e) => {
                warn!(target: LOG_TARGET, "Invalid audio cue path, cue disabled: {}", e);
                Self::default()
            }
        }
    }

    /// Play the cue without waiting for it to finish.
    ///
    /// Must be called from within the Dioxus runtime.
    pub fn play(&self) {
        let Some(url) = self.url.clone() else {
            return;
        };

        spawn(async move {
            // JSON string literals are valid JS string literals
            let src = serde_json::Value::String(url).to_string();
            let js = format!("return new Audio({src}).play().then(() => true);");

            match document::eval(&js).await {
                Ok(_) => debug!(target: LOG_TARGET, "Played audio cue"),
                Err(e) => warn!(target: LOG_TARGET, "Failed to play audio cue: {}", e),
            }
        });
    }
}
