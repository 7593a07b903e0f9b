use serde::{Deserialize, Serialize};
use std::fmt;

/// A duration decomposed into whole hours, minutes and seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hms {
    pub hours:   u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Hms {
    /// Round to the nearest second (ties to even) and split.
    /// Negative and non-finite inputs render as zero.
    pub fn from_seconds(seconds: f64) -> Self {
        let total = if seconds.is_finite() && seconds > 0.0 {
            seconds.round_ties_even() as u64
        } else {
            0
        };
        Self {
            hours:   total / 3600,
            minutes: total % 3600 / 60,
            seconds: total % 60,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hours > 0 {
            write!(f, "{}h ", self.hours)?;
        }
        write!(f, "{}m {}s", self.minutes, self.seconds)
    }
}

/// `3661.0` -> `"1h 1m 1s"`, `59.0` -> `"0m 59s"`.
pub fn format_duration(seconds: f64) -> String {
    Hms::from_seconds(seconds).to_string()
}
