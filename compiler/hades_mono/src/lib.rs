//! Monomorphization for Hades HIR.
//!
//! Generic functions and structs are templates: [`monomorphize`] drops them
//! and emits one concrete copy per distinct list of type arguments the
//! program instantiates them at, named by [`specialized_name`]. Afterwards
//! [`validate`] confirms nothing generic is left.

mod error;
mod mangle;
mod monomorphizer;
mod validate;

pub use error::MonoError;
pub use mangle::specialized_name;
pub use monomorphizer::{MonoConfig, Monomorphizer, SpecializationRequest};
pub use validate::{validate, ValidationError};

use hades_hir::HirModule;
use hades_ir::StringInterner;

/// Monomorphize `module`.
///
/// # Errors
/// See [`Monomorphizer::run`].
pub fn monomorphize(
    module: &HirModule,
    interner: &StringInterner,
    config: MonoConfig,
) -> Result<HirModule, MonoError> {
    Monomorphizer::new(module, interner, config).run()
}
