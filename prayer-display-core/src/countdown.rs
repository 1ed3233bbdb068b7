//! Indonesian countdown text, e.g. `Iqamah Subuh 9 menit 30 detik lagi`.

use crate::schedule::Target;
use chrono::{DateTime, Local, TimeDelta};

/// Honorific placed before the name of an iqama target.
const IQAMA_PREFIX: &str = "Iqamah ";

/// Display name for an event identifier. Unknown names pass through.
#[must_use]
pub fn event_display_name(name: &str) -> &str {
    match name {
        "fajr" | "nextFajr" => "Subuh",
        "sunrise" => "Syuruq",
        "zuhr" => "Zuhur",
        "asr" => "Ashar",
        "maghrib" => "Maghrib",
        "isha" => "Isha",
        other => other,
    }
}

/// Display name for a target, prefixed with the honorific for iqama targets.
#[must_use]
pub fn target_display_name(target: &Target) -> String {
    let name = event_display_name(target.event_name());
    if target.is_iqama() {
        format!("{IQAMA_PREFIX}{name}")
    } else {
        name.to_string()
    }
}

/// Relative phrase for the time left, omitting zero-valued units.
///
/// Seconds are dropped once the delta reaches an hour. Negative deltas read
/// as zero seconds.
#[must_use]
pub fn countdown_phrase(delta: TimeDelta) -> String {
    let total = delta.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        if minutes == 0 {
            format!("{hours} jam lagi")
        } else {
            format!("{hours} jam {minutes} menit lagi")
        }
    } else if minutes > 0 {
        if seconds == 0 {
            format!("{minutes} menit lagi")
        } else {
            format!("{minutes} menit {seconds} detik lagi")
        }
    } else {
        format!("{seconds} detik lagi")
    }
}

/// Full countdown line for `target` as seen from `now`.
#[must_use]
pub fn countdown_text(target: &Target, now: &DateTime<Local>) -> String {
    format!(
        "{} {}",
        target_display_name(target),
        countdown_phrase(target.time.signed_duration_since(*now))
    )
}
