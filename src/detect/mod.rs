//! Environment detection.
//!
//! Decides whether animated, cursor-rewriting output is safe. Animation is
//! refused when stdout is not a terminal, when running under CI (logs are
//! captured as flat text and a rewritten line turns into duplicated noise),
//! when the terminal declares no cursor control, or when the user opted out.
//!
//! Every check has a `*_with` variant that takes an environment lookup, so
//! the rules can be tested without touching the process environment.
//!
//! # Example
//!
//! ```
//! use humanlog::detect::Capabilities;
//!
//! let caps = Capabilities {
//!     tty: true,
//!     ci: false,
//!     dumb_terminal: false,
//!     animation_disabled: false,
//! };
//! assert!(caps.can_animate());
//! ```

mod env;
mod terminal;

pub use env::{any_flag_set, flag_set, is_truthy, process_env, FALSEY_VALUES};
pub use terminal::{is_dumb_term_value, is_tty, DUMB_TERM};

/// Variables set by CI providers. `CI` is the generic one.
pub const CI_ENV_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "BUILDKITE",
    "CIRCLECI",
    "JENKINS_URL",
    "TF_BUILD",
];

/// Variables that opt out of animation.
pub const ANIMATION_OPT_OUT_VARS: &[&str] = &["HUMANLOG_NO_ANIMATE", "NO_COLOR"];

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    is_ci_with(process_env)
}

/// Check for CI with a custom env var lookup.
///
/// A falsey generic `CI` does not mask a provider flag: `CI=0` together
/// with `GITHUB_ACTIONS=1` is still CI.
pub fn is_ci_with<F>(env: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    any_flag_set(&env, CI_ENV_VARS)
}

/// Check if `TERM` describes a terminal without cursor control.
pub fn is_dumb_terminal() -> bool {
    is_dumb_terminal_with(process_env)
}

/// Check for a dumb terminal with a custom env var lookup.
///
/// An unset `TERM` counts as dumb.
pub fn is_dumb_terminal_with<F>(env: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    is_dumb_term_value(&env("TERM").unwrap_or_default())
}

/// Check if the user opted out of animation.
pub fn is_animation_disabled() -> bool {
    is_animation_disabled_with(process_env)
}

/// Check for an animation opt-out with a custom env var lookup.
pub fn is_animation_disabled_with<F>(env: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    any_flag_set(&env, ANIMATION_OPT_OUT_VARS)
}

/// Check if single-line animation is safe and readable.
pub fn can_animate() -> bool {
    Capabilities::detect().can_animate()
}

/// Snapshot of every check that feeds [`can_animate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Stdout is an interactive terminal.
    pub tty: bool,
    /// Running under a CI provider.
    pub ci: bool,
    /// `TERM` says the terminal has no cursor control.
    pub dumb_terminal: bool,
    /// The user opted out of animation.
    pub animation_disabled: bool,
}

impl Capabilities {
    /// Detect capabilities from the process environment and stdout.
    pub fn detect() -> Self {
        Self::detect_with(is_tty(), process_env)
    }

    /// Detect with an explicit TTY answer and a custom env var lookup.
    pub fn detect_with<F>(tty: bool, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let caps = Self {
            tty,
            ci: is_ci_with(&env),
            dumb_terminal: is_dumb_terminal_with(&env),
            animation_disabled: is_animation_disabled_with(&env),
        };
        tracing::debug!(
            tty = caps.tty,
            ci = caps.ci,
            dumb_terminal = caps.dumb_terminal,
            animation_disabled = caps.animation_disabled,
            "detected terminal capabilities"
        );
        caps
    }

    /// True only when every check allows animation.
    pub fn can_animate(&self) -> bool {
        self.tty && !self.ci && !self.dumb_terminal && !self.animation_disabled
    }
}
