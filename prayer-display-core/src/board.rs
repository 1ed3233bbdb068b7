//! Display board state: current time, schedule and the indices derived from them.
//!
//! The state is a single owned record. The UI mutates it from timer tasks and
//! click handlers, and renders from it after every mutation.

use crate::countdown::countdown_text;
use crate::datetime::{day_name, full_date, hijri_date, iso_time_string};
use crate::schedule::{Event, Image, Schedule, Target};
use chrono::{DateTime, Datelike, Local, TimeDelta};
use tracing::{debug, info, warn};

/// How far before an event the debug preview starts, in seconds
pub const DEFAULT_PREVIEW_LEAD_SECS: i64 = 15;

/// Result of a clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[must_use]
pub struct Tick {
    /// The countdown moved on to another target and the cue should sound
    pub play_cue: bool,
}

/// Everything the display renders from.
#[derive(Debug, Clone)]
pub struct DisplayState {
    time: DateTime<Local>,
    images: Vec<Image>,
    events: Vec<Event>,
    targets: Vec<Target>,
    next_event: Option<usize>,
    active_image: Option<usize>,
    current_target: Option<usize>,
    debug_mode: bool,
    preview_lead: TimeDelta,
    fetch_error: Option<String>,
}

impl DisplayState {
    /// Create an empty board showing `now`.
    #[must_use]
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            time: now,
            images: Vec::new(),
            events: Vec::new(),
            targets: Vec::new(),
            next_event: None,
            active_image: None,
            current_target: None,
            debug_mode: false,
            preview_lead: TimeDelta::seconds(DEFAULT_PREVIEW_LEAD_SECS),
            fetch_error: None,
        }
    }

    /// Set how far before an event the debug preview starts.
    #[must_use]
    pub fn with_preview_lead(mut self, lead: TimeDelta) -> Self {
        self.preview_lead = lead;
        self
    }

    /// Replace the schedule with a freshly fetched one.
    pub fn apply_schedule(&mut self, schedule: Schedule) {
        info!(
            "Applying schedule: {} events, {} targets, {} images",
            schedule.events.len(),
            schedule.targets.len(),
            schedule.images.len()
        );
        self.images = schedule.images;
        self.events = schedule.events;
        self.targets = schedule.targets;
        self.fetch_error = None;
        self.refresh_indices();
    }

    /// Remember the message of a failed fetch for the error banner.
    ///
    /// Returns `true` for the first failure since the last applied schedule,
    /// so repeated failures can be reported once.
    pub fn set_fetch_error(&mut self, message: impl Into<String>) -> bool {
        let first = self.fetch_error.is_none();
        self.fetch_error = Some(message.into());
        first
    }

    /// Advance the clock by one tick.
    ///
    /// Real-time mode takes `now` as the display time; debug mode adds one
    /// second to the simulated time instead.
    pub fn tick(&mut self, now: DateTime<Local>) -> Tick {
        if self.debug_mode {
            self.time += TimeDelta::seconds(1);
        } else {
            self.time = now;
        }

        let old_target = self.current_target;
        self.refresh_indices();

        let play_cue = old_target.is_some() && self.current_target != old_target;
        if play_cue {
            debug!(
                "Target changed from {:?} to {:?}",
                old_target, self.current_target
            );
        }
        Tick { play_cue }
    }

    /// Move to the next background image, wrapping at the end.
    pub fn rotate_image(&mut self) {
        let next = self.active_image.map_or(0, |i| i + 1);
        self.active_image = Some(if next >= self.images.len() { 0 } else { next });
    }

    /// Enter debug mode with simulated time just before event `index`.
    ///
    /// Returns `false` if there is no such event or the lead reaches past
    /// the representable time range.
    pub fn preview_event(&mut self, index: usize) -> bool {
        let Some(event) = self.events.get(index) else {
            return false;
        };
        let Some(start) = event.time.checked_sub_signed(self.preview_lead) else {
            warn!("Preview lead too large for event {}", event.name);
            return false;
        };
        info!("Previewing event {}", event.name);
        self.time = start;
        self.debug_mode = true;
        true
    }

    /// Leave debug mode and show real time again.
    pub fn resume_real_time(&mut self, now: DateTime<Local>) {
        if self.debug_mode {
            info!("Returning to real time");
        }
        self.debug_mode = false;
        self.time = now;
    }

    fn refresh_indices(&mut self) {
        let now = self.time;
        self.next_event = self.events.iter().position(|e| e.is_upcoming(&now));
        self.current_target = self.targets.iter().position(|t| t.time > now);
    }

    #[must_use]
    pub const fn time(&self) -> &DateTime<Local> {
        &self.time
    }

    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    #[must_use]
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Index of the first event that has not fully passed.
    #[must_use]
    pub const fn next_event(&self) -> Option<usize> {
        self.next_event
    }

    /// Index of the target the countdown runs towards.
    #[must_use]
    pub const fn current_target(&self) -> Option<usize> {
        self.current_target
    }

    #[must_use]
    pub const fn active_image_index(&self) -> Option<usize> {
        self.active_image
    }

    /// The background image to show, if any.
    #[must_use]
    pub fn active_image(&self) -> Option<&Image> {
        self.active_image.and_then(|i| self.images.get(i))
    }

    #[must_use]
    pub const fn is_debug_mode(&self) -> bool {
        self.debug_mode
    }

    #[must_use]
    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    /// Clock text with seconds.
    #[must_use]
    pub fn clock_text(&self) -> String {
        iso_time_string(Some(&self.time), true)
    }

    /// Date line in both calendars, e.g. `Kamis, 15 Oktober 2026 M / 03 Jumadilawal 1448 H`.
    #[must_use]
    pub fn date_line(&self) -> String {
        format!(
            "{}, {} M / {} H",
            day_name(self.time.weekday()),
            full_date(Some(&self.time)),
            hijri_date(Some(&self.time))
        )
    }

    /// Countdown to the current target, empty when none remains.
    #[must_use]
    pub fn countdown(&self) -> String {
        self.current_target
            .and_then(|i| self.targets.get(i))
            .map_or_else(String::new, |target| countdown_text(target, &self.time))
    }
}
