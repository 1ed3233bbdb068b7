//! Duration conversion helpers.

use std::time::Duration;

/// Extension trait for Duration conversions used in log messages.
pub trait DurationExt {
    /// Whole minutes, rounded up.
    fn as_minutes_ceil(&self) -> u64;
}

impl DurationExt for Duration {
    fn as_minutes_ceil(&self) -> u64 {
        let secs = self.as_secs() + u64::from(self.subsec_nanos() > 0);
        secs.div_ceil(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_minutes_ceil() {
        assert_eq!(Duration::ZERO.as_minutes_ceil(), 0);
        assert_eq!(Duration::from_secs(60).as_minutes_ceil(), 1);
        assert_eq!(Duration::from_secs(61).as_minutes_ceil(), 2);
        assert_eq!(Duration::from_millis(500).as_minutes_ceil(), 1);
        assert_eq!(Duration::from_secs(14 * 3600 + 60).as_minutes_ceil(), 841);
    }
}
