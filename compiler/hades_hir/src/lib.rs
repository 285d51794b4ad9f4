//! Hades HIR: the typed, statement-level form later passes work on.
//!
//! - [`HirDefinition`], [`HirBlock`], [`HirStatement`], [`HirExpression`]: the node types
//! - [`HirModule`]: an ordered set of definitions with lookup by name
//! - [`HirBuilder`]: emits statements into nested blocks
//! - [`HirVisitor`] / [`HirTransformer`]: read-only and rebuilding traversals
//! - [`HirModule::pretty_print`]: a textual dump
//!
//! Every expression carries its [`Type`](hades_types::Type). Before
//! monomorphization a module may still contain generic definitions and
//! types that mention type parameters; afterwards it must not.

mod builder;
mod ir;
mod module;
mod pretty;
mod visit;

pub use builder::HirBuilder;
pub use ir::{
    HirBlock, HirConst, HirConstant, HirDefinition, HirExprKind, HirExpression,
    HirExternFunction, HirFunction, HirFunctionSignature, HirParam, HirStatement,
    HirStatementKind, HirStruct, HirTypeParam, MatchIntArm,
};
pub use module::HirModule;
pub use pretty::HirModuleDisplay;
pub use visit::{HirTransformer, HirVisitor};
