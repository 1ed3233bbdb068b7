//! Daily schedule polling.

use crate::config::ScheduleConfig;
use crate::schedule::Schedule;
use crate::source::ScheduleSource;
use crate::time::DurationExt;
use chrono::{DateTime, Local, TimeDelta, TimeZone};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Events emitted by the schedule poller
#[derive(Debug, Clone)]
pub enum ScheduleEvent {
    /// A new schedule was fetched
    Loaded { schedule: Schedule },
    /// Fetching failed; `retry_in` is `None` when no retry is scheduled
    FetchFailed {
        message: String,
        retry_in: Option<Duration>,
    },
}

/// Time from `now` until `offset` past the next local midnight.
///
/// Falls back to 24 hours when that wall-clock time does not exist locally
/// or cannot be represented.
#[must_use]
pub fn delay_until_next_day<Tz: TimeZone>(now: &DateTime<Tz>, offset: Duration) -> Duration {
    let fallback = Duration::from_secs(24 * 60 * 60);

    let Some(midnight) = now
        .date_naive()
        .succ_opt()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
    else {
        return fallback;
    };
    let Ok(offset) = TimeDelta::from_std(offset) else {
        return fallback;
    };
    let Some(target) = midnight
        .checked_add_signed(offset)
        .and_then(|local| now.timezone().from_local_datetime(&local).earliest())
    else {
        return fallback;
    };

    target
        .signed_duration_since(now)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

/// Fetches the schedule once a day and publishes the result.
pub struct SchedulePoller {
    source: Box<dyn ScheduleSource>,
    refresh_offset: Duration,
    retry_interval: Option<Duration>,
    latest: RwLock<Option<ScheduleEvent>>,
    event_tx: broadcast::Sender<ScheduleEvent>,
    cancel_token: CancellationToken,
}

impl SchedulePoller {
    /// Create a new schedule poller
    ///
    /// # Arguments
    /// * `source` - Where the schedule is fetched from
    /// * `config` - Refresh offset and retry interval
    /// * `cancel_token` - Optional external cancellation token for graceful shutdown
    pub fn new(
        source: Box<dyn ScheduleSource>,
        config: &ScheduleConfig,
        cancel_token: Option<CancellationToken>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(16);

        Self {
            source,
            refresh_offset: config.refresh_offset(),
            retry_interval: config.retry_interval(),
            latest: RwLock::new(None),
            event_tx,
            cancel_token: cancel_token.unwrap_or_default(),
        }
    }

    /// Subscribe to schedule events
    pub fn subscribe(&self) -> broadcast::Receiver<ScheduleEvent> {
        self.event_tx.subscribe()
    }

    /// The most recent event, for subscribers that join late
    pub async fn latest(&self) -> Option<ScheduleEvent> {
        self.latest.read().await.clone()
    }

    /// Get a clone of the cancellation token
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Start polling in a background task
    #[must_use]
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Run the polling loop until cancelled, or until a fetch fails with
    /// retrying turned off.
    pub async fn run(&self) {
        info!("Starting schedule poller (source: {})", self.source.name());

        loop {
            let Some(delay) = self.poll_once().await else {
                if !self.cancel_token.is_cancelled() {
                    warn!("Schedule poller stopped after a failed fetch; restart to try again");
                }
                break;
            };

            tokio::select! {
                () = self.cancel_token.cancelled() => {
                    info!("Schedule poller shutting down");
                    break;
                }
                () = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Fetch once and publish the outcome.
    ///
    /// Returns the delay before the next fetch, or `None` if polling should stop.
    async fn poll_once(&self) -> Option<Duration> {
        let event = tokio::select! {
            () = self.cancel_token.cancelled() => return None,
            result = self.source.fetch() => match result {
                Ok(schedule) => ScheduleEvent::Loaded { schedule },
                Err(e) => {
                    error!("Failed to fetch schedule: {}", e);
                    ScheduleEvent::FetchFailed {
                        message: e.to_string(),
                        retry_in: self.retry_interval,
                    }
                }
            },
        };

        let next = match &event {
            ScheduleEvent::Loaded { .. } => {
                let delay = delay_until_next_day(&Local::now(), self.refresh_offset);
                info!("Will reload schedule in {} minutes", delay.as_minutes_ceil());
                Some(delay)
            }
            ScheduleEvent::FetchFailed { retry_in, .. } => {
                if let Some(retry) = retry_in {
                    info!("Retrying schedule fetch in {} seconds", retry.as_secs());
                }
                *retry_in
            }
        };

        *self.latest.write().await = Some(event.clone());
        // No receivers yet is fine, late subscribers read `latest`
        let _ = self.event_tx.send(event);

        next
    }
}
