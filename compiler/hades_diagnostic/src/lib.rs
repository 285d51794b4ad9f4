//! Diagnostics for the Hades compiler.
//!
//! Passes report problems as [`Diagnostic`] values built with a fluent API
//! and identified by a stable [`ErrorCode`]. A [`DiagnosticQueue`] collects
//! them, drops duplicates and follow-on noise, and hands them back in
//! source order.

mod diagnostic;
mod error_code;
mod queue;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
