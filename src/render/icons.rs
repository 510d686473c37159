//! Line kinds and their icons.

/// Which output stream a line goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl Stream {
    /// Stream name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// Every kind of line humanlog prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// A step started.
    Start,
    /// A step finished successfully.
    Success,
    /// A step failed.
    Failure,
    /// Standalone informational line.
    Info,
    /// Standalone warning.
    Warning,
    /// Standalone error.
    Error,
}

impl LineKind {
    /// Icon printed in front of the label or message.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Start => "→",
            Self::Success => "✓",
            Self::Failure | Self::Error => "✖",
            Self::Info => "ℹ",
            Self::Warning => "⚠",
        }
    }

    /// Stream the line is written to.
    ///
    /// Step lines and info go to stdout; warnings and errors go to stderr.
    pub fn stream(self) -> Stream {
        match self {
            Self::Warning | Self::Error => Stream::Stderr,
            Self::Start | Self::Success | Self::Failure | Self::Info => Stream::Stdout,
        }
    }
}
