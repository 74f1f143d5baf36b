use serde::{Deserialize, Serialize};
use std::fmt;

/// Estimated print time, normalized so that minutes and seconds are always below 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintDuration {
    pub hours: u64,
    pub minutes: u8,
    pub seconds: u8,
}

impl PrintDuration {
    /// Decompose a raw second count, e.g. 5400 -> 1h 30m 0s.
    pub fn from_total_seconds(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: ((total % 3600) / 60) as u8,
            seconds: (total % 60) as u8,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.hours * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }
}

/// Canonical rendering: leading zero components are dropped, trailing ones are kept.
impl fmt::Display for PrintDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hours > 0 {
            write!(f, "{}h {}m {}s", self.hours, self.minutes, self.seconds)
        } else if self.minutes > 0 {
            write!(f, "{}m {}s", self.minutes, self.seconds)
        } else {
            write!(f, "{}s", self.seconds)
        }
    }
}
