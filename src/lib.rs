//! humanlog - one-line progress and logging for humans.
//!
//! humanlog prints status lines for one step of work at a time, with
//! timestamps and `key=value` metadata. On an interactive terminal a step
//! renders on a single line that is rewritten when it finishes; in CI,
//! pipes, dumb terminals, or with `NO_COLOR`/`HUMANLOG_NO_ANIMATE` set, every
//! event gets its own timestamped line.
//!
//! # Modules
//!
//! - [`detect`] - Terminal and environment capability detection
//! - [`error`] - Error types and result aliases
//! - [`mock`] - Test doubles for clocks and output streams
//! - [`render`] - Metadata formatting, clocks, and line icons
//! - [`tracker`] - The single-step progress tracker
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
//!     .with_clock(MockClock::new("09:30:00").with_readings([0.0, 0.5]))
//!     .with_animation(|| false);
//!
//! log.run("build", |_| Ok::<_, std::io::Error>(())).unwrap();
//! assert_eq!(out.lines()[1], "[09:30:00] ✓ build (time=0.50s)");
//! ```
//!
//! For the process-wide logger, see [`log()`].

pub mod detect;
pub mod error;
mod global;
pub mod mock;
pub mod render;
pub mod tracker;

pub use detect::{can_animate, Capabilities};
pub use error::{HumanLogError, Result};
pub use global::log;
pub use render::{Fields, Value};
pub use tracker::{HumanLog, StepHandle};
