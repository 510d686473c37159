//! Single-step progress tracker.
//!
//! [`HumanLog`] holds at most one step. Starting a step, or printing an
//! info/warn/error line, finishes any step still in flight as successful.
//! Whether a step animates is decided once, when it starts: an animated step
//! prints `→ label …` without a newline and its completion line overwrites
//! it with a carriage return, while a static step prints two timestamped
//! lines.
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
//!     .with_clock(MockClock::new("12:00:00").with_readings([0.0, 1.5]))
//!     .with_animation(|| false);
//!
//! {
//!     let _step = log.step("compile").scoped();
//! }
//!
//! assert_eq!(
//!     out.lines(),
//!     ["[12:00:00] → compile", "[12:00:00] ✓ compile (time=1.50s)"]
//! );
//! ```

mod step;

pub use step::{error_category, failure_fields, StepHandle};

use std::fmt;
use std::io::Write;

use console::Term;

use crate::detect;
use crate::error::{HumanLogError, Result};
use crate::render::{format_elapsed, Clock, Fields, LineKind, Stream, SystemClock};

use step::ActiveStep;

/// Human-readable progress and log lines for one step at a time.
pub struct HumanLog {
    current: Option<ActiveStep>,
    stdout: Box<dyn Write + Send>,
    stderr: Box<dyn Write + Send>,
    clock: Box<dyn Clock>,
    animation: Box<dyn Fn() -> bool + Send>,
}

impl HumanLog {
    /// Create a logger writing to the terminal's stdout and stderr.
    ///
    /// Animation is decided per step by [`detect::can_animate`].
    pub fn new() -> Self {
        Self {
            current: None,
            stdout: Box::new(Term::stdout()),
            stderr: Box::new(Term::stderr()),
            clock: Box::new(SystemClock::new()),
            animation: Box::new(detect::can_animate),
        }
    }

    /// Replace the stdout writer.
    pub fn with_stdout<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.stdout = Box::new(writer);
        self
    }

    /// Replace the stderr writer.
    pub fn with_stderr<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.stderr = Box::new(writer);
        self
    }

    /// Replace the clock.
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the animation check consulted when a step starts.
    pub fn with_animation<F>(mut self, check: F) -> Self
    where
        F: Fn() -> bool + Send + 'static,
    {
        self.animation = Box::new(check);
        self
    }

    /// Check if a step is in flight.
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Label of the step in flight, if any.
    pub fn current_label(&self) -> Option<&str> {
        self.current.as_ref().map(|step| step.label.as_str())
    }

    /// Start a step, finishing any step still in flight first.
    ///
    /// The step stays open after the returned handle is dropped; see
    /// [`StepHandle`] for finishing it when a scope ends.
    pub fn step(&mut self, label: impl Into<String>) -> StepHandle<'_> {
        self.end_step_if_any();

        let label = label.into();
        let animated = (self.animation)();
        let start = self.clock.now();
        let icon = LineKind::Start.icon();
        let line = if animated {
            format!("{icon} {label} …")
        } else {
            format!("[{}] {icon} {label}\n", self.clock.timestamp())
        };

        tracing::debug!(label = %label, animated, "step started");
        self.current = Some(ActiveStep {
            label,
            start,
            animated,
        });
        self.emit(Stream::Stdout, &line);

        StepHandle::new(self)
    }

    /// Run a fallible closure as a step. See [`StepHandle::run`].
    pub fn run<T, E, F>(&mut self, label: impl Into<String>, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut HumanLog) -> std::result::Result<T, E>,
        E: fmt::Display,
    {
        self.step(label).run(f)
    }

    /// Finish the step in flight successfully. No-op without one.
    pub fn done(&mut self, fields: impl Into<Fields>) {
        self.complete(LineKind::Success, fields.into());
    }

    /// Finish the step in flight as failed. No-op without one.
    pub fn fail(&mut self, fields: impl Into<Fields>) {
        self.complete(LineKind::Failure, fields.into());
    }

    /// Print an info line to stdout.
    pub fn info(&mut self, msg: &str, fields: impl Into<Fields>) {
        self.message(LineKind::Info, msg, fields.into());
    }

    /// Print a warning line to stderr.
    pub fn warn(&mut self, msg: &str, fields: impl Into<Fields>) {
        self.message(LineKind::Warning, msg, fields.into());
    }

    /// Print an error line to stderr.
    pub fn error(&mut self, msg: &str, fields: impl Into<Fields>) {
        self.message(LineKind::Error, msg, fields.into());
    }

    fn complete(&mut self, kind: LineKind, mut fields: Fields) {
        let Some(step) = self.current.take() else {
            return;
        };

        let elapsed = self.clock.now().saturating_sub(step.start);
        fields.insert("time", format_elapsed(elapsed));

        let icon = kind.icon();
        let label = &step.label;
        let line = if step.animated {
            format!("\r{icon} {label}{fields}\n")
        } else {
            format!("[{}] {icon} {label}{fields}\n", self.clock.timestamp())
        };

        tracing::debug!(
            label = %step.label,
            ?kind,
            elapsed_ms = elapsed.as_millis() as u64,
            "step finished"
        );
        self.emit(kind.stream(), &line);
    }

    fn message(&mut self, kind: LineKind, msg: &str, fields: Fields) {
        self.end_step_if_any();
        let line = format!(
            "[{}] {} {msg}{fields}\n",
            self.clock.timestamp(),
            kind.icon()
        );
        self.emit(kind.stream(), &line);
    }

    fn end_step_if_any(&mut self) {
        if self.current.is_some() {
            self.done(Fields::new());
        }
    }

    fn emit(&mut self, stream: Stream, line: &str) {
        if let Err(err) = self.write(stream, line) {
            tracing::debug!(error = %err, "dropped log line");
        }
    }

    fn write(&mut self, stream: Stream, line: &str) -> Result<()> {
        let writer = match stream {
            Stream::Stdout => &mut self.stdout,
            Stream::Stderr => &mut self.stderr,
        };
        writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|source| HumanLogError::write(stream.name(), source))
    }
}

impl Default for HumanLog {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HumanLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HumanLog")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use crate::mock::{CaptureBuffer, MockClock};
    use std::io;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Harness {
        log: HumanLog,
        out: CaptureBuffer,
        err: CaptureBuffer,
    }

    fn harness(readings: &[f64], animated: bool) -> Harness {
        let out = CaptureBuffer::new();
        let err = CaptureBuffer::new();
        let log = HumanLog::new()
            .with_stdout(out.clone())
            .with_stderr(err.clone())
            .with_clock(MockClock::new("09:30:00").with_readings(readings.iter().copied()))
            .with_animation(move || animated);
        Harness { log, out, err }
    }

    #[derive(Debug)]
    struct RuntimeError;

    impl fmt::Display for RuntimeError {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Counts flushes and keeps nothing.
    #[derive(Clone, Default)]
    struct FlushCounter(Arc<AtomicUsize>);

    impl FlushCounter {
        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl Write for FlushCounter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn info_closes_active_step_and_prints_info() {
        let mut h = harness(&[10.0, 12.5], false);

        h.log.step("download");
        h.log.info("ready", fields! { items = 3 });

        assert_eq!(
            h.out.lines(),
            [
                "[09:30:00] → download",
                "[09:30:00] ✓ download (time=2.50s)",
                "[09:30:00] ℹ ready (items=3)",
            ]
        );
        assert!(!h.log.is_active());
    }

    #[test]
    fn animated_step_overwrites_start_line() {
        let mut h = harness(&[5.0, 6.2], true);

        h.log.step("sync");
        h.log.done(Fields::new());

        assert_eq!(h.out.contents(), "→ sync …\r✓ sync (time=1.20s)\n");
    }

    #[test]
    fn render_mode_is_fixed_at_step_start() {
        let animate = Arc::new(AtomicBool::new(true));
        let check = Arc::clone(&animate);
        let out = CaptureBuffer::new();
        let mut log = HumanLog::new()
            .with_stdout(out.clone())
            .with_clock(MockClock::new("09:30:00").with_readings([5.0, 6.2]))
            .with_animation(move || check.load(Ordering::SeqCst));

        log.step("sync");
        animate.store(false, Ordering::SeqCst);
        log.done(Fields::new());

        assert_eq!(out.contents(), "→ sync …\r✓ sync (time=1.20s)\n");
    }

    #[test]
    fn animation_check_runs_once_per_step() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut log = HumanLog::new()
            .with_stdout(CaptureBuffer::new())
            .with_clock(MockClock::new("09:30:00"))
            .with_animation(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                false
            });

        log.step("one");
        log.info("between", Fields::new());
        log.done(Fields::new());
        log.step("two");
        log.fail(Fields::new());

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn run_fails_step_with_error_category() {
        let mut h = harness(&[3.0, 3.5], false);

        let result: std::result::Result<(), RuntimeError> =
            h.log.run("build", |_| Err(RuntimeError));

        assert!(result.is_err());
        assert_eq!(
            h.out.lines(),
            [
                "[09:30:00] → build",
                "[09:30:00] ✖ build (error=RuntimeError, time=0.50s)",
            ]
        );
    }

    #[test]
    fn run_includes_error_message() {
        let mut h = harness(&[0.0, 0.25], false);

        let err = h
            .log
            .run("fetch", |_| -> io::Result<()> {
                Err(io::Error::new(io::ErrorKind::TimedOut, "timed out"))
            })
            .unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
        assert_eq!(
            h.out.lines()[1],
            r#"[09:30:00] ✖ fetch (error=Error, message="timed out", time=0.25s)"#
        );
    }

    #[test]
    fn run_returns_value_and_completes_step() {
        let mut h = harness(&[1.0, 2.0], false);

        let value = h.log.run("count", |_| Ok::<_, RuntimeError>(42)).unwrap();

        assert_eq!(value, 42);
        assert_eq!(h.out.lines()[1], "[09:30:00] ✓ count (time=1.00s)");
    }

    #[test]
    fn dropping_handle_completes_step() {
        let mut h = harness(&[0.0, 0.5], false);
        {
            let _step = h.log.step("scoped").scoped();
        }
        assert_eq!(h.out.lines()[1], "[09:30:00] ✓ scoped (time=0.50s)");
    }

    #[test]
    fn bare_step_stays_open_until_done() {
        let mut h = harness(&[0.0, 5.0], false);

        h.log.step("download");
        assert!(h.log.is_active());
        h.log.done(fields! { items = 3 });

        assert_eq!(
            h.out.lines(),
            [
                "[09:30:00] → download",
                "[09:30:00] ✓ download (items=3, time=5.00s)",
            ]
        );
    }

    #[test]
    fn dropped_handle_leaves_step_to_next_line() {
        let mut h = harness(&[0.0, 2.0], true);
        {
            let _handle = h.log.step("scan");
        }
        assert_eq!(h.log.current_label(), Some("scan"));

        h.log.fail(fields! { reason = "offline" });

        assert_eq!(
            h.out.contents(),
            "→ scan …\r✖ scan (reason=offline, time=2.00s)\n"
        );
    }

    #[test]
    fn run_fails_step_on_boxed_error() {
        let mut h = harness(&[0.0, 0.5], false);

        let result: std::result::Result<(), Box<dyn std::error::Error>> =
            h.log.run("parse", |_| Err("bad".into()));

        assert!(result.is_err());
        assert_eq!(
            h.out.lines()[1],
            r#"[09:30:00] ✖ parse (error="dyn Error", message=bad, time=0.50s)"#
        );
    }

    #[test]
    fn explicit_done_inside_scope_is_not_repeated() {
        let mut h = harness(&[0.0, 0.5], false);
        {
            let mut step = h.log.step("scoped").scoped();
            step.done(fields! { items = 2 });
        }
        assert_eq!(
            h.out.lines(),
            [
                "[09:30:00] → scoped",
                "[09:30:00] ✓ scoped (items=2, time=0.50s)",
            ]
        );
    }

    #[test]
    fn panicking_scope_fails_step() {
        let out = CaptureBuffer::new();
        let captured = out.clone();

        let result = std::panic::catch_unwind(move || {
            let mut log = HumanLog::new()
                .with_stdout(captured)
                .with_clock(MockClock::new("09:30:00").with_readings([0.0, 1.0]))
                .with_animation(|| false);
            let _step = log.step("explode").scoped();
            panic!("boom");
        });

        assert!(result.is_err());
        assert_eq!(
            out.lines()[1],
            "[09:30:00] ✖ explode (error=panic, time=1.00s)"
        );
    }

    #[test]
    fn new_step_finishes_previous_step() {
        let mut h = harness(&[0.0, 1.0, 1.0, 3.0], false);

        h.log.step("first");
        h.log.step("second");
        h.log.done(Fields::new());

        assert_eq!(
            h.out.lines(),
            [
                "[09:30:00] → first",
                "[09:30:00] ✓ first (time=1.00s)",
                "[09:30:00] → second",
                "[09:30:00] ✓ second (time=2.00s)",
            ]
        );
    }

    #[test]
    fn done_and_fail_without_step_are_noops() {
        let mut h = harness(&[], false);
        h.log.done(Fields::new());
        h.log.fail(fields! { reason = "none" });
        assert!(h.out.is_empty());
        assert!(h.err.is_empty());
    }

    #[test]
    fn second_done_is_noop() {
        let mut h = harness(&[0.0, 1.0], false);
        h.log.step("once");
        h.log.done(Fields::new());
        h.log.done(Fields::new());
        assert_eq!(h.out.lines().len(), 2);
    }

    #[test]
    fn fail_uses_failure_icon() {
        let mut h = harness(&[2.0, 2.75], false);
        h.log.step("deploy");
        h.log.fail(fields! { code = 500 });
        assert_eq!(
            h.out.lines()[1],
            "[09:30:00] ✖ deploy (code=500, time=0.75s)"
        );
    }

    #[test]
    fn caller_time_field_is_replaced_in_place() {
        let mut h = harness(&[0.0, 1.0], false);
        h.log.step("timed");
        h.log.done(fields! { time = "later", items = 1 });
        assert_eq!(
            h.out.lines()[1],
            "[09:30:00] ✓ timed (time=1.00s, items=1)"
        );
    }

    #[test]
    fn warn_and_error_write_to_stderr() {
        let mut h = harness(&[], false);

        h.log.warn("slow", fields! { retry = 1 });
        h.log.error("failed", fields! { code = 500 });

        assert!(h.out.is_empty());
        assert_eq!(
            h.err.lines(),
            [
                "[09:30:00] ⚠ slow (retry=1)",
                "[09:30:00] ✖ failed (code=500)",
            ]
        );
    }

    #[test]
    fn warn_closes_step_on_stdout_first() {
        let mut h = harness(&[0.0, 0.1], false);

        h.log.step("index");
        h.log.warn("stale cache", Fields::new());

        assert_eq!(
            h.out.lines(),
            ["[09:30:00] → index", "[09:30:00] ✓ index (time=0.10s)"]
        );
        assert_eq!(h.err.lines(), ["[09:30:00] ⚠ stale cache"]);
    }

    #[test]
    fn animated_step_closed_by_info() {
        let mut h = harness(&[0.0, 2.0], true);

        h.log.step("scan");
        h.log.info("found", fields! { files = 12 });

        assert_eq!(
            h.out.contents(),
            "→ scan …\r✓ scan (time=2.00s)\n[09:30:00] ℹ found (files=12)\n"
        );
    }

    #[test]
    fn messages_without_fields_have_no_suffix() {
        let mut h = harness(&[], false);
        h.log.info("hello", Fields::new());
        assert_eq!(h.out.contents(), "[09:30:00] ℹ hello\n");
    }

    #[test]
    fn every_line_is_flushed_on_its_stream() {
        let out = FlushCounter::default();
        let err = FlushCounter::default();
        let mut log = HumanLog::new()
            .with_stdout(out.clone())
            .with_stderr(err.clone())
            .with_clock(MockClock::new("09:30:00"))
            .with_animation(|| true);

        log.step("a");
        assert_eq!(out.count(), 1);

        log.warn("w", Fields::new());
        assert_eq!(out.count(), 2);
        assert_eq!(err.count(), 1);

        log.info("i", Fields::new());
        log.error("e", Fields::new());
        assert_eq!(out.count(), 3);
        assert_eq!(err.count(), 2);
    }

    #[test]
    fn write_failures_are_swallowed() {
        let mut log = HumanLog::new()
            .with_stdout(BrokenPipe)
            .with_stderr(BrokenPipe)
            .with_clock(MockClock::new("09:30:00"))
            .with_animation(|| false);

        log.step("quiet");
        log.info("still fine", Fields::new());
        log.error("still fine", Fields::new());
        assert!(!log.is_active());
    }

    #[test]
    fn current_label_tracks_step() {
        let mut h = harness(&[], false);
        assert_eq!(h.log.current_label(), None);
        h.log.step("label");
        assert_eq!(h.log.current_label(), Some("label"));
        h.log.done(Fields::new());
        assert_eq!(h.log.current_label(), None);
    }

    #[test]
    fn elapsed_never_negative() {
        let mut h = harness(&[5.0, 4.0], false);
        h.log.step("skew");
        h.log.done(Fields::new());
        assert_eq!(h.out.lines()[1], "[09:30:00] ✓ skew (time=0.00s)");
    }

    #[test]
    fn debug_shows_current_step() {
        let mut h = harness(&[], false);
        h.log.step("visible");
        assert!(format!("{:?}", h.log).contains("visible"));
    }
}
