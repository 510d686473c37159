//! Time sources for step timing and line timestamps.

use std::time::{Duration, Instant};

use chrono::Local;

/// Source of monotonic readings and wall-clock labels.
pub trait Clock: Send {
    /// Monotonic reading. Only differences between readings are meaningful.
    fn now(&self) -> Duration;

    /// Local wall-clock label in `HH:MM:SS` form.
    fn timestamp(&self) -> String;
}

/// Clock backed by [`Instant`] and the local time zone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn timestamp(&self) -> String {
        timestamp()
    }
}

/// Current local time as `HH:MM:SS`.
pub fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Format an elapsed duration as seconds with two decimals, e.g. `2.50s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}
