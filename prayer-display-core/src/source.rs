//! Schedule source trait.

use crate::error::Result;
use crate::schedule::Schedule;
use async_trait::async_trait;

/// Trait for anything that can supply the day's schedule.
///
/// The HTTP implementation lives in `prayer-display-api`. Implementations
/// should:
///
/// - Fetch the raw payload and build a [`Schedule`] from it
/// - Apply their own deadline and report it as [`CoreError::Timeout`](crate::CoreError::Timeout)
/// - Report non-success responses with their status and body
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Fetch the current schedule
    async fn fetch(&self) -> Result<Schedule>;
}
