//! Diagnostic severity levels.

/// How serious a diagnostic is.
///
/// `Error` severity marks conditions that abort the placement run; `Note`
/// carries debug-level progress counters that are only interesting when a
/// verbose flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Progress or statistics reporting (per-temperature counters and costs).
    Note,
    /// A condition worth surfacing that does not abort the run.
    Warning,
    /// A fatal condition; the placement run is aborted.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{text}")
    }
}
