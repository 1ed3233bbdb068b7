use crate::cue::CuePlayer;
use crate::state::DisplayBoard;
use dioxus::prelude::*;
use prayer_display_core::{ScheduleEvent, SchedulePoller};
use rfd::{AsyncMessageDialog, MessageButtons, MessageLevel};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

const LOG_TARGET: &str = "prayer_display::bridge";

/// Bridge `SchedulePoller` events to the board signal.
/// The first fetch failure after a success is also shown in a native alert.
pub fn use_schedule_bridge(poller: Arc<SchedulePoller>, board: DisplayBoard) {
    use_future(move || {
        let poller = poller.clone();
        async move {
            let mut rx = poller.subscribe();

            // The first fetch may finish before the window exists
            if let Some(event) = poller.latest().await {
                handle_schedule_event(event, board);
            }

            loop {
                match rx.recv().await {
                    Ok(event) => {
                        handle_schedule_event(event, board);
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        info!(target: LOG_TARGET, "Schedule event channel closed");
                        break;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        info!(target: LOG_TARGET, "Missed {} schedule events", n);
                    }
                }
            }
        }
    });
}

fn handle_schedule_event(event: ScheduleEvent, mut board: DisplayBoard) {
    if let Some(message) = board.apply(event) {
        spawn(show_fetch_error_dialog(message));
    }
}

async fn show_fetch_error_dialog(message: String) {
    AsyncMessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Prayer Display - Schedule Unavailable")
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show()
        .await;
}

/// Advance the board clock every `interval` and sound the cue on target changes.
pub fn use_clock(mut board: DisplayBoard, cue: CuePlayer, interval: Duration) {
    use_future(move || {
        let cue = cue.clone();
        async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if board.tick().play_cue {
                    debug!(target: LOG_TARGET, "Countdown target changed, playing cue");
                    cue.play();
                }
            }
        }
    });
}

/// Rotate the background image every `interval`, starting immediately.
pub fn use_image_rotation(mut board: DisplayBoard, interval: Duration) {
    use_future(move || async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            board.rotate_image();
        }
    });
}
