//! The diagnostic record emitted by placement stages.

use crate::severity::Severity;

/// The placement stage a diagnostic originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Model construction and initial placement.
    Build,
    /// The simulated annealing loop.
    Anneal,
    /// The post-anneal centroid fine-tuning pass.
    FineTune,
    /// Final conflict-free placement commit.
    Legalize,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Stage::Build => "build",
            Stage::Anneal => "anneal",
            Stage::FineTune => "fine-tune",
            Stage::Legalize => "legalize",
        };
        write!(f, "{text}")
    }
}

/// A single diagnostic message from a placement stage.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// How serious this diagnostic is.
    pub severity: Severity,
    /// The stage that emitted it.
    pub stage: Stage,
    /// Human-readable message.
    pub message: String,
    /// The macro this diagnostic refers to, if any.
    pub macro_name: Option<String>,
}

impl Diagnostic {
    /// Creates a note-severity diagnostic.
    pub fn note(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Note,
            stage,
            message: message.into(),
            macro_name: None,
        }
    }

    /// Creates a warning-severity diagnostic.
    pub fn warning(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            stage,
            message: message.into(),
            macro_name: None,
        }
    }

    /// Creates an error-severity diagnostic.
    pub fn error(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            stage,
            message: message.into(),
            macro_name: None,
        }
    }

    /// Attaches the name of the macro this diagnostic refers to.
    pub fn with_macro(mut self, name: impl Into<String>) -> Self {
        self.macro_name = Some(name.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.macro_name {
            Some(name) => write!(
                f,
                "{}[{}]: {} (macro {})",
                self.severity, self.stage, self.message, name
            ),
            None => write!(f, "{}[{}]: {}", self.severity, self.stage, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_constructor() {
        let diag = Diagnostic::note(Stage::Anneal, "temperature step done");
        assert_eq!(diag.severity, Severity::Note);
        assert_eq!(diag.stage, Stage::Anneal);
        assert!(diag.macro_name.is_none());
    }

    #[test]
    fn error_with_macro() {
        let diag = Diagnostic::error(Stage::Legalize, "no conflict-free site").with_macro("mac_3");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.macro_name.as_deref(), Some("mac_3"));
    }

    #[test]
    fn display_format() {
        let diag = Diagnostic::warning(Stage::Build, "slow enumeration").with_macro("filt");
        assert_eq!(
            format!("{diag}"),
            "warning[build]: slow enumeration (macro filt)"
        );
        let plain = Diagnostic::note(Stage::FineTune, "moved 3 macros");
        assert_eq!(format!("{plain}"), "note[fine-tune]: moved 3 macros");
    }
}
