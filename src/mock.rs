//! Test doubles for the logger's collaborators.
//!
//! `MockClock` replays scripted monotonic readings and a fixed timestamp.
//! `CaptureBuffer` is a cloneable writer that keeps everything written to
//! it, so output can be asserted after the logger is done with it.
//!
//! # Example
//!
//! ```
//! use humanlog::mock::{CaptureBuffer, MockClock};
//! use humanlog::{fields, HumanLog};
//!
//! let out = CaptureBuffer::new();
//! let mut log = HumanLog::new()
//!     .with_stdout(out.clone())
//!     .with_clock(MockClock::new("09:30:00").with_readings([10.0, 12.5]))
//!     .with_animation(|| false);
//!
//! log.step("download");
//! log.info("ready", fields! { items = 3 });
//!
//! assert_eq!(
//!     out.lines(),
//!     [
//!         "[09:30:00] → download",
//!         "[09:30:00] ✓ download (time=2.50s)",
//!         "[09:30:00] ℹ ready (items=3)",
//!     ]
//! );
//! ```

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::render::Clock;

/// Clock with scripted readings.
///
/// Each call to [`Clock::now`] pops the next reading. Once the script runs
/// out, the last reading repeats.
#[derive(Debug)]
pub struct MockClock {
    timestamp: String,
    readings: RefCell<VecDeque<Duration>>,
    last: Cell<Duration>,
}

impl MockClock {
    /// Create a clock that always reports `timestamp` and reads zero.
    pub fn new(timestamp: &str) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            readings: RefCell::new(VecDeque::new()),
            last: Cell::new(Duration::ZERO),
        }
    }

    /// Queue monotonic readings, in seconds.
    ///
    /// Negative and NaN readings read as zero; readings too large for a
    /// `Duration` read as `Duration::MAX`.
    pub fn with_readings(self, secs: impl IntoIterator<Item = f64>) -> Self {
        self.readings
            .borrow_mut()
            .extend(secs.into_iter().map(reading));
        self
    }

    /// Number of readings not yet consumed.
    pub fn remaining(&self) -> usize {
        self.readings.borrow().len()
    }
}

fn reading(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX)
}

impl Clock for MockClock {
    fn now(&self) -> Duration {
        if let Some(next) = self.readings.borrow_mut().pop_front() {
            self.last.set(next);
        }
        self.last.get()
    }

    fn timestamp(&self) -> String {
        self.timestamp.clone()
    }
}

/// Shared in-memory writer.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, as text.
    pub fn contents(&self) -> String {
        let bytes = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Written text split into lines, without line endings.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
