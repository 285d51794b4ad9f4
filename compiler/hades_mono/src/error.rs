use hades_diagnostic::{Diagnostic, ErrorCode};
use hades_ir::SourceLocation;

/// A monomorphization failure caused by the input program.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MonoError {
    /// The program instantiates more distinct specializations than the
    /// configured limit, usually because a generic definition instantiates
    /// itself with ever-growing type arguments.
    #[error("more than {limit} specializations requested; `{name}` would exceed the limit")]
    SpecializationLimit {
        limit: usize,
        name: String,
        /// The generic definition whose instantiation crossed the limit.
        location: SourceLocation,
    },
}

impl MonoError {
    pub fn code(&self) -> ErrorCode {
        match self {
            MonoError::SpecializationLimit { .. } => ErrorCode::E3001,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            MonoError::SpecializationLimit { location, .. } => Diagnostic::error(self.code())
                .with_message(self.to_string())
                .with_label(*location, "instantiated here")
                .with_note("generic instantiations must form a finite set"),
        }
    }
}
