//! Boolean environment flags.
//!
//! A flag is "set" when the variable exists and its value is not one of the
//! falsey spellings. `CI=0` therefore reads as unset, while `CI=yes`,
//! `CI=1` and `CI=anything` all read as set.

/// Values (after trimming and lowercasing) that switch a flag off.
pub const FALSEY_VALUES: &[&str] = &["", "0", "false", "no", "off"];

/// Check whether a raw environment value counts as "on".
///
/// ```
/// use humanlog::detect::is_truthy;
///
/// assert!(is_truthy("1"));
/// assert!(is_truthy("true"));
/// assert!(!is_truthy(" OFF "));
/// assert!(!is_truthy(""));
/// ```
pub fn is_truthy(value: &str) -> bool {
    let normalized = value.trim().to_lowercase();
    !FALSEY_VALUES.contains(&normalized.as_str())
}

/// Look up a variable in the process environment.
///
/// Non-UTF-8 values are converted lossily rather than treated as missing,
/// so a present-but-odd value still counts as set.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
}

/// Check a single flag through the given lookup.
pub fn flag_set<F>(env: &F, key: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    env(key).is_some_and(|value| is_truthy(&value))
}

/// Check whether any of `keys` is set. Each key is judged on its own.
pub fn any_flag_set<F>(env: &F, keys: &[&str]) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter().any(|key| flag_set(env, key))
}
