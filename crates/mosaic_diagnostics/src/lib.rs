//! Diagnostic reporting for the Mosaic placement toolkit.
//!
//! Placement stages report progress and problems as [`Diagnostic`] values
//! emitted into a shared [`DiagnosticSink`]. Diagnostics reference macros and
//! run counters rather than source locations; the host tool decides how to
//! render or persist them.

#![warn(missing_docs)]

pub mod diagnostic;
pub mod severity;
pub mod sink;

pub use diagnostic::{Diagnostic, Stage};
pub use severity::Severity;
pub use sink::DiagnosticSink;
