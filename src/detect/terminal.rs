//! Terminal capability checks.

use console::Term;

/// The `TERM` value terminals use to say they cannot move the cursor.
pub const DUMB_TERM: &str = "dumb";

/// Check whether stdout is an interactive terminal.
///
/// Never fails: anything that prevents the check answers `false`.
pub fn is_tty() -> bool {
    Term::stdout().is_term()
}

/// Check whether a `TERM` value describes a terminal without cursor control.
///
/// Empty, `dumb`, and `dumb` followed by a separator (`dumb-emacs`,
/// `dumb:mono`) all qualify. `dumbterm` does not.
pub fn is_dumb_term_value(term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() || term == DUMB_TERM {
        return true;
    }

    term.strip_prefix(DUMB_TERM)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|sep| !sep.is_alphanumeric())
}
