//! Request deadlines written as millisecond counts or shorthand strings.
//!
//! Accepted forms are a bare number of milliseconds (`60000`, `"60000"`) or a
//! number followed by a unit: `ms`, `s`, `m`/`M` (minutes), `h`/`H` (hours).
//! A zero duration disables the deadline.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A request deadline together with the text it was written as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimeoutRepr", into = "TimeoutRepr")]
pub struct TimeoutSpec {
    label: String,
    duration: Duration,
}

/// Config representation: either a TOML integer or a string.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TimeoutRepr {
    Millis(u64),
    Text(String),
}

impl TimeoutSpec {
    /// Build a deadline from a millisecond count.
    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self {
            label: ms.to_string(),
            duration: Duration::from_millis(ms),
        }
    }

    /// The deadline, or `None` when it is disabled.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        if self.duration.is_zero() {
            None
        } else {
            Some(self.duration)
        }
    }

    /// The text the deadline was written as, used in timeout messages.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for TimeoutSpec {
    fn default() -> Self {
        Self {
            label: "1m".to_string(),
            duration: Duration::from_secs(60),
        }
    }
}

impl FromStr for TimeoutSpec {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = || CoreError::InvalidDuration {
            input: s.to_string(),
        };

        let split = input
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(input.len());
        let (digits, unit) = input.split_at(split);
        if digits.is_empty() {
            return Err(invalid());
        }

        let value: u64 = digits.parse().map_err(|_| invalid())?;
        let millis_per_unit: u64 = match unit {
            "" | "ms" => 1,
            "s" => 1_000,
            "m" | "M" => 60 * 1_000,
            "h" | "H" => 60 * 60 * 1_000,
            _ => return Err(invalid()),
        };
        let millis = value.checked_mul(millis_per_unit).ok_or_else(invalid)?;

        Ok(Self {
            label: input.to_string(),
            duration: Duration::from_millis(millis),
        })
    }
}

impl TryFrom<TimeoutRepr> for TimeoutSpec {
    type Error = CoreError;

    fn try_from(repr: TimeoutRepr) -> Result<Self, Self::Error> {
        match repr {
            TimeoutRepr::Millis(ms) => Ok(Self::from_millis(ms)),
            TimeoutRepr::Text(text) => text.parse(),
        }
    }
}

impl From<TimeoutSpec> for TimeoutRepr {
    fn from(spec: TimeoutSpec) -> Self {
        Self::Text(spec.label)
    }
}

impl fmt::Display for TimeoutSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_number_is_millis() {
        let spec: TimeoutSpec = "1500".parse().unwrap();
        assert_eq!(spec.duration(), Some(Duration::from_millis(1500)));
        assert_eq!(spec.label(), "1500");
    }

    #[test]
    fn test_parse_units() {
        let cases = [
            ("250ms", Duration::from_millis(250)),
            ("30s", Duration::from_secs(30)),
            ("1m", Duration::from_secs(60)),
            ("2M", Duration::from_secs(120)),
            ("1h", Duration::from_secs(3600)),
            ("1H", Duration::from_secs(3600)),
        ];
        for (input, expected) in cases {
            let spec: TimeoutSpec = input.parse().unwrap();
            assert_eq!(spec.duration(), Some(expected), "input {input}");
        }
    }

    #[test]
    fn test_zero_disables_deadline() {
        let spec: TimeoutSpec = "0s".parse().unwrap();
        assert_eq!(spec.duration(), None);
        assert_eq!(TimeoutSpec::from_millis(0).duration(), None);
    }

    #[test]
    fn test_rejects_unknown_unit() {
        assert!(matches!(
            "5d".parse::<TimeoutSpec>(),
            Err(CoreError::InvalidDuration { .. })
        ));
        assert!("m".parse::<TimeoutSpec>().is_err());
        assert!("".parse::<TimeoutSpec>().is_err());
        assert!("-5s".parse::<TimeoutSpec>().is_err());
    }

    #[test]
    fn test_rejects_overflow() {
        assert!(format!("{}H", u64::MAX).parse::<TimeoutSpec>().is_err());
    }

    #[test]
    fn test_deserialize_from_integer_and_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            timeout: TimeoutSpec,
        }

        let numeric: Wrapper = toml::from_str("timeout = 5000").unwrap();
        assert_eq!(numeric.timeout.duration(), Some(Duration::from_secs(5)));

        let text: Wrapper = toml::from_str("timeout = \"1m\"").unwrap();
        assert_eq!(text.timeout.duration(), Some(Duration::from_secs(60)));
        assert_eq!(text.timeout.to_string(), "1m");

        assert!(toml::from_str::<Wrapper>("timeout = \"soon\"").is_err());
    }
}
