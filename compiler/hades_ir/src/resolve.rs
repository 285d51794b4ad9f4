//! Name resolution interface.
//!
//! The type checker does not bind names itself. It asks a [`Resolver`] what
//! an identifier refers to, and gets back references into the AST it is
//! checking. Any scoping discipline can sit behind this trait.

use crate::ast::{
    Declaration, Expression, ExternFunctionDef, FunctionDef, Identifier, Param, QualifiedPath,
    StructDef, ThisParam, TypeParamDecl, ValStatement, ConstDef,
};
use crate::{QualifiedName, SourceLocation};

/// What a value-level name refers to.
#[derive(Copy, Clone, Debug)]
pub enum ValueBinding<'ast> {
    GlobalFunction(&'ast FunctionDef),
    ExternFunction(&'ast ExternFunctionDef),
    FunctionParam {
        function: &'ast FunctionDef,
        param: &'ast Param,
    },
    ValBinding(&'ast ValStatement),
    Struct(&'ast StructDef),
    GlobalConst(&'ast ConstDef),
}

/// What a type-level name refers to.
#[derive(Copy, Clone, Debug)]
pub enum TypeBinding<'ast> {
    Struct(&'ast StructDef),
    TypeParam(&'ast TypeParamDecl),
}

pub trait Resolver<'ast> {
    /// Binding of a variable reference.
    fn resolve(&self, name: &Identifier) -> Option<ValueBinding<'ast>>;

    /// Binding of a name written in type position.
    fn resolve_type_variable(&self, name: &Identifier) -> Option<TypeBinding<'ast>>;

    /// Struct named by a module-qualified path.
    fn resolve_qualified_struct_def(&self, path: &QualifiedPath) -> Option<&'ast StructDef>;

    /// Global reached through a module alias, for a property expression
    /// of the form `alias.name`.
    fn resolve_module_property(&self, property: &Expression) -> Option<ValueBinding<'ast>>;

    /// Top-level declaration enclosing `location`.
    fn declaration_containing(&self, location: SourceLocation) -> Option<&'ast Declaration>;

    /// `this` parameter in scope at a `this` expression.
    fn resolve_this_param(&self, this: &Expression) -> Option<&'ast ThisParam>;

    /// Extension functions named like `property`, in scan order.
    fn extension_defs_in_scope(&self, property: &Identifier) -> Vec<&'ast FunctionDef>;

    /// Module path of the declaring file, followed by the struct's name.
    fn qualified_struct_name(&self, def: &StructDef) -> QualifiedName;
}
