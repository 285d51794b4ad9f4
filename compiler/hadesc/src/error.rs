use hades_diagnostic::Diagnostic;
use hades_mono::{MonoError, ValidationError};

/// Why a compilation stopped.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The program has type errors. Diagnostics are already sorted,
    /// deduplicated and limited by the session's `DiagnosticConfig`.
    #[error("type checking failed with {} error(s)", .0.len())]
    TypeCheck(Vec<Diagnostic>),

    #[error(transparent)]
    Mono(#[from] MonoError),

    /// Monomorphization left generic or malformed nodes behind. Always a
    /// compiler defect.
    #[error("{} malformed node(s) after monomorphization", .0.len())]
    Validation(Vec<ValidationError>),
}

impl CompileError {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            CompileError::TypeCheck(diagnostics) => diagnostics.clone(),
            CompileError::Mono(error) => vec![error.to_diagnostic()],
            CompileError::Validation(errors) => {
                errors.iter().map(ValidationError::to_diagnostic).collect()
            }
        }
    }
}
