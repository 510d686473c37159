//! The active step and its scope guard.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use crate::render::Fields;

use super::HumanLog;

/// A step in flight.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ActiveStep {
    pub(crate) label: String,
    pub(crate) start: Duration,
    /// Render mode chosen at start; the completion line uses it too.
    pub(crate) animated: bool,
}

/// Handle for a step started with [`HumanLog::step`].
///
/// The step stays open until `done`, `fail`, or the next line finishes it;
/// dropping a plain handle does nothing. Call [`scoped`](Self::scoped) to
/// turn it into a guard that finishes the step on drop (with `done`, or with
/// `fail` and `error=panic` while unwinding), or [`run`](Self::run) to fail
/// the step when a closure returns `Err`.
///
/// The handle dereferences to the logger, so `info`, `warn` and friends can
/// be called through it.
pub struct StepHandle<'a> {
    log: &'a mut HumanLog,
    armed: bool,
}

impl<'a> StepHandle<'a> {
    pub(crate) fn new(log: &'a mut HumanLog) -> Self {
        Self { log, armed: false }
    }

    /// Finish the step when this handle goes out of scope.
    #[must_use = "a scope guard finishes the step as soon as it is dropped; bind it with `let _step = ...`"]
    pub fn scoped(mut self) -> Self {
        self.armed = true;
        self
    }

    /// Run `f` inside the step.
    ///
    /// `Ok` finishes the step with `done`. `Err` fails it with
    /// `error={type name}` and, when the error has text, `message={text}`;
    /// the error is then returned unchanged. A panic in `f` fails the step
    /// with `error=panic`.
    pub fn run<T, E, F>(mut self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut HumanLog) -> std::result::Result<T, E>,
        E: fmt::Display,
    {
        self.armed = true;
        let result = f(&mut *self.log);
        self.armed = false;
        match &result {
            Ok(_) => self.log.done(Fields::new()),
            Err(err) => self.log.fail(failure_fields(err)),
        }
        result
    }
}

impl Deref for StepHandle<'_> {
    type Target = HumanLog;

    fn deref(&self) -> &HumanLog {
        &*self.log
    }
}

impl DerefMut for StepHandle<'_> {
    fn deref_mut(&mut self) -> &mut HumanLog {
        &mut *self.log
    }
}

impl Drop for StepHandle<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if std::thread::panicking() {
            self.log.fail(Fields::new().with("error", "panic"));
        } else {
            self.log.done(Fields::new());
        }
    }
}

impl fmt::Debug for StepHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepHandle")
            .field("step", &self.log.current_label())
            .field("armed", &self.armed)
            .finish()
    }
}

/// Fields describing an error that ended a step.
pub fn failure_fields<E: fmt::Display>(err: &E) -> Fields {
    let mut fields = Fields::new().with("error", error_category::<E>());
    let message = err.to_string();
    if !message.is_empty() {
        fields.insert("message", message);
    }
    fields
}

/// Smart pointers whose pointee names the error better than they do.
const WRAPPERS: &[&str] = &["Box", "Arc", "Rc"];

/// Short name of an error type: `std::io::Error` is `Error`,
/// `my_app::FetchError<T>` is `FetchError`, `Box<MyError>` is `MyError`.
///
/// Trait objects have no concrete name, so `Box<dyn Error + Send>` is
/// `dyn Error`.
pub fn error_category<E: ?Sized>() -> String {
    category_from_type_name(std::any::type_name::<E>())
}

fn category_from_type_name(name: &str) -> String {
    let name = name.trim();
    if let Some(object) = name.strip_prefix("dyn ") {
        let first = object.split(" + ").next().unwrap_or(object);
        return format!("dyn {}", last_segment(first));
    }

    let Some(open) = name.find('<') else {
        return last_segment(name).to_string();
    };
    let short = last_segment(&name[..open]);
    if WRAPPERS.contains(&short) {
        let args = name[open + 1..].strip_suffix('>').unwrap_or(&name[open + 1..]);
        return category_from_type_name(first_type_arg(args));
    }
    short.to_string()
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// First top-level argument of a generic argument list.
fn first_type_arg(args: &str) -> &str {
    let mut depth = 0usize;
    for (i, c) in args.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return &args[..i],
            _ => {}
        }
    }
    args
}
