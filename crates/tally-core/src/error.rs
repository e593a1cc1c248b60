use std::fmt;

/// Machine-readable error codes surfaced in CLI output and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    TaskNotFound,
    InvalidStatus,
    CorruptRow,
    StoreWriteFailed,
    CacheUnavailable,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::TaskNotFound => "E2001",
            Self::InvalidStatus => "E2002",
            Self::CorruptRow => "E3001",
            Self::StoreWriteFailed => "E5001",
            Self::CacheUnavailable => "E6001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Project not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::TaskNotFound => "Task not found",
            Self::InvalidStatus => "Invalid status value",
            Self::CorruptRow => "Corrupt task row",
            Self::StoreWriteFailed => "Task store write failed",
            Self::CacheUnavailable => "Snapshot cache unavailable",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `tly init` to initialize this directory."),
            Self::ConfigParseError => Some("Fix syntax in .tally/config.toml and retry."),
            Self::TaskNotFound => Some("Use `tly list` to see known task IDs."),
            Self::InvalidStatus => Some("Use one of: pending, in_progress, completed."),
            Self::CorruptRow => Some("The row is skipped; re-save the task to repair it."),
            Self::StoreWriteFailed => Some("Check disk space and write permissions."),
            Self::CacheUnavailable => {
                Some("The dashboard is recomputed directly; caching resumes when writable.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
