use chrono::{Local, TimeDelta};
use dioxus::prelude::*;
use prayer_display_core::{DisplaySettings, DisplayState, ScheduleEvent, Tick};

/// Reactive wrapper around the board state.
///
/// Every mutation goes through the signal, so components re-render after
/// each tick, rotation, click and schedule update.
#[derive(Clone, Copy)]
pub struct DisplayBoard {
    pub state: Signal<DisplayState>,
}

impl DisplayBoard {
    #[must_use]
    pub fn new(settings: &DisplaySettings) -> Self {
        let lead = TimeDelta::try_seconds(settings.preview_lead_secs).unwrap_or_else(|| {
            TimeDelta::seconds(prayer_display_core::DEFAULT_PREVIEW_LEAD_SECS)
        });
        let state = DisplayState::new(Local::now()).with_preview_lead(lead);
        Self {
            state: Signal::new(state),
        }
    }

    pub fn tick(&mut self) -> Tick {
        self.state.write().tick(Local::now())
    }

    pub fn rotate_image(&mut self) {
        self.state.write().rotate_image();
    }

    /// Jump to just before event `index` in simulated time
    pub fn preview_event(&mut self, index: usize) {
        let _ = self.state.write().preview_event(index);
    }

    pub fn resume_real_time(&mut self) {
        self.state.write().resume_real_time(Local::now());
    }

    /// Apply a poller event.
    ///
    /// Returns the failure message for the first failure after a success;
    /// later failures only update the banner.
    pub fn apply(&mut self, event: ScheduleEvent) -> Option<String> {
        match event {
            ScheduleEvent::Loaded { schedule } => {
                self.state.write().apply_schedule(schedule);
                None
            }
            ScheduleEvent::FetchFailed { message, .. } => {
                let first = self.state.write().set_fetch_error(message.clone());
                first.then_some(message)
            }
        }
    }
}
