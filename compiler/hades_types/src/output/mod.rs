//! Type checker output.
//!
//! [`TypedProgram`] is the owned snapshot a [`Checker`](crate::Checker)
//! leaves behind: every memo table it filled, keyed by node location, plus
//! the errors it collected. Later passes (HIR lowering, monomorphization)
//! read types from here instead of re-running inference.

use hades_diagnostic::{Diagnostic, DiagnosticConfig, DiagnosticQueue};
use hades_ir::ast::FunctionDef;
use hades_ir::{HasLocation, SourceLocation, StringInterner};
use rustc_hash::FxHashMap;

use crate::{Type, TypeCheckError};

/// Types of a checked program.
///
/// # Example
///
/// ```ignore
/// let mut checker = Checker::new(&resolver, &interner);
/// checker.check_program(&program);
/// let typed = checker.finish();
/// if typed.has_errors() {
///     for diagnostic in typed.diagnostics(&interner, DiagnosticConfig::default()) {
///         eprintln!("{diagnostic}");
///     }
/// }
/// ```
#[derive(Clone, Debug, Default)]
pub struct TypedProgram<'ast> {
    pub(crate) expression_types: FxHashMap<SourceLocation, Type>,
    pub(crate) binder_types: FxHashMap<SourceLocation, Type>,
    pub(crate) annotation_types: FxHashMap<SourceLocation, Type>,
    /// Inferred type arguments, recorded for both a generic call and its
    /// callee.
    pub(crate) type_arguments: FxHashMap<SourceLocation, Vec<Type>>,
    /// Extension function each method-style property resolved to.
    pub(crate) extension_defs: FxHashMap<SourceLocation, &'ast FunctionDef>,
    pub(crate) errors: Vec<TypeCheckError>,
}

impl<'ast> TypedProgram<'ast> {
    pub fn expression_type(&self, expression: &impl HasLocation) -> Option<&Type> {
        self.expression_types.get(&expression.location())
    }

    pub fn binder_type(&self, binder: &impl HasLocation) -> Option<&Type> {
        self.binder_types.get(&binder.location())
    }

    pub fn annotation_type(&self, annotation: &impl HasLocation) -> Option<&Type> {
        self.annotation_types.get(&annotation.location())
    }

    pub fn type_args(&self, node: &impl HasLocation) -> Option<&[Type]> {
        self.type_arguments.get(&node.location()).map(Vec::as_slice)
    }

    pub fn extension_def(&self, property: &impl HasLocation) -> Option<&'ast FunctionDef> {
        self.extension_defs.get(&property.location()).copied()
    }

    pub fn errors(&self) -> &[TypeCheckError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn expression_count(&self) -> usize {
        self.expression_types.len()
    }

    /// Errors as diagnostics, filtered and sorted by `config`.
    pub fn diagnostics(&self, interner: &StringInterner, config: DiagnosticConfig) -> Vec<Diagnostic> {
        let mut queue = DiagnosticQueue::with_config(config);
        for error in &self.errors {
            queue.add(error.to_diagnostic(interner));
        }
        queue.flush()
    }
}
