//! Process-wide logger.

use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;

use crate::tracker::HumanLog;

static GLOBAL: Lazy<Mutex<HumanLog>> = Lazy::new(|| Mutex::new(HumanLog::new()));

/// Lock the process-wide logger.
///
/// The lock serializes writers across threads. Bind the guard to keep a
/// step open across statements:
///
/// ```no_run
/// use humanlog::fields;
///
/// let mut log = humanlog::log();
/// log.step("download");
/// log.info("ready", fields! { items = 3 });
/// ```
///
/// A poisoned lock is recovered: a panic elsewhere must not silence
/// progress output.
pub fn log() -> MutexGuard<'static, HumanLog> {
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner)
}
