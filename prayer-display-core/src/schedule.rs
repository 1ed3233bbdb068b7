//! Schedule payload from `/api/data` and the collections derived from it.

use crate::datetime::local_from_millis;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

/// Event name that only feeds the countdown and is never listed.
pub const NEXT_FAJR: &str = "nextFajr";

/// Suffix marking a target as the iqama of its event.
pub const IQAMA_SUFFIX: &str = "Iqama";

/// Event as sent by the API, with epoch-millisecond timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub name: String,
    pub time: i64,
    /// Missing, zero or negative means the event has no iqama
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iqama: Option<i64>,
}

/// Background slide with the theme colors extracted from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Image {
    pub url: String,
    pub main_color: String,
    pub header_main: String,
    pub header_accent: String,
    pub header_font: String,
    pub footer_main: String,
    pub footer_accent: String,
    pub footer_font: String,
}

impl Image {
    /// Make a relative image URL absolute against the API base URL.
    pub fn resolve_against(&mut self, base: &Url) {
        match base.join(&self.url) {
            Ok(resolved) => self.url = resolved.into(),
            Err(e) => warn!("Keeping unresolvable image URL {:?}: {}", self.url, e),
        }
    }

    /// CSS custom properties for the root element, in declaration order.
    #[must_use]
    pub fn css_variables(&self) -> [(&'static str, &str); 7] {
        [
            ("--main-color", self.main_color.as_str()),
            ("--header-main", self.header_main.as_str()),
            ("--header-accent", self.header_accent.as_str()),
            ("--header-color", self.header_font.as_str()),
            ("--footer-main", self.footer_main.as_str()),
            ("--footer-accent", self.footer_accent.as_str()),
            ("--footer-color", self.footer_font.as_str()),
        ]
    }
}

/// Response body of `GET /api/data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiData {
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

/// A named daily occurrence, such as a prayer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub time: DateTime<Local>,
    pub iqama: Option<DateTime<Local>>,
}

impl Event {
    /// Whether the event or its iqama is still ahead of `now`.
    #[must_use]
    pub fn is_upcoming(&self, now: &DateTime<Local>) -> bool {
        let iqama = self.iqama.as_ref().unwrap_or(&self.time);
        self.time > *now || iqama > now
    }
}

/// A chronological checkpoint the countdown runs towards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub time: DateTime<Local>,
}

impl Target {
    /// Whether this target is the iqama of an event.
    #[must_use]
    pub fn is_iqama(&self) -> bool {
        self.name.ends_with(IQAMA_SUFFIX)
    }

    /// Name of the event this target belongs to.
    #[must_use]
    pub fn event_name(&self) -> &str {
        self.name.strip_suffix(IQAMA_SUFFIX).unwrap_or(&self.name)
    }
}

/// One day's schedule ready for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    pub images: Vec<Image>,
    pub events: Vec<Event>,
    pub targets: Vec<Target>,
}

impl Schedule {
    /// Flatten the API payload into displayed events and countdown targets.
    ///
    /// Targets keep the order the API sent the events in. Events whose
    /// timestamps cannot be represented are skipped.
    #[must_use]
    pub fn from_api(data: ApiData) -> Self {
        let mut events = Vec::with_capacity(data.events.len());
        let mut targets = Vec::with_capacity(data.events.len() * 2);

        for raw in data.events {
            let Some(time) = local_from_millis(raw.time) else {
                warn!("Skipping event {} with invalid time {}", raw.name, raw.time);
                continue;
            };
            let iqama = raw
                .iqama
                .filter(|&ms| ms > 0)
                .and_then(local_from_millis);

            targets.push(Target {
                name: raw.name.clone(),
                time,
            });
            if let Some(iqama) = iqama {
                targets.push(Target {
                    name: format!("{}{IQAMA_SUFFIX}", raw.name),
                    time: iqama,
                });
            }

            if raw.name != NEXT_FAJR {
                events.push(Event {
                    name: raw.name,
                    time,
                    iqama,
                });
            }
        }

        debug!(
            "Built schedule with {} events, {} targets, {} images",
            events.len(),
            targets.len(),
            data.images.len()
        );

        Self {
            images: data.images,
            events,
            targets,
        }
    }
}
