//! The Hades compiler pipeline.
//!
//! A [`Session`] runs the middle of the compiler over a parsed program:
//!
//! ```text
//! Program ──ScopeResolver + Checker──▶ TypedProgram
//!         ──lowering (caller)────────▶ HirModule (generic)
//!         ──monomorphize + validate──▶ HirModule (concrete)
//! ```
//!
//! Parsing, HIR lowering and code generation live outside this crate. The
//! lowering step is supplied by the caller of [`Session::compile`].
//!
//! Failures come back as a [`CompileError`]; [`CompileError::diagnostics`]
//! turns any of them into diagnostics ready for reporting.

mod error;
mod options;
mod session;
mod tracing_setup;

pub use error::CompileError;
pub use options::Options;
pub use session::Session;
pub use tracing_setup::init_tracing;
