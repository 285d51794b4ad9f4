//! Type model and type checker for Hades.
//!
//! - [`Type`]: the owned type tree, with [`Substitution`] and the
//!   [`TypeFolder`]/[`TypeVisitor`] traversal seams
//! - [`Unifier`]: assignability, which doubles as unification of
//!   [`GenericInstance`]s
//! - [`Checker`]: bidirectional, memoized inference over the AST
//! - [`TypedProgram`]: what the checker leaves behind for later passes

mod check;
mod flags;
mod output;
mod substitution;
#[cfg(test)]
mod test_support;
mod traverse;
mod ty;
mod type_error;
mod unify;

pub use check::Checker;
pub use flags::TypeFlags;
pub use output::TypedProgram;
pub use substitution::Substitution;
pub use traverse::{walk_type, TypeFolder, TypeVisitor};
pub use ty::{
    Constructor, FunctionType, GenericInstance, StructType, Type, TypeDisplay, TypeParam,
};
pub use type_error::{TypeCheckError, TypeErrorKind};
pub use unify::Unifier;

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::GenericInstance;
    // Binder (16) + id (8). Instances are created for every generic call.
    hades_ir::static_assert_size!(GenericInstance, 24);
}
