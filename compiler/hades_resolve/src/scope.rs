//! Scopes and per-file global tables.

use hades_ir::ast::{DeclarationKind, FunctionDef, SourceFile};
use hades_ir::{Name, QualifiedName, TypeBinding, ValueBinding};
use rustc_hash::FxHashMap;

/// One lexical scope: a function's parameters, or a block's locals.
#[derive(Default)]
pub(crate) struct Scope<'ast> {
    pub(crate) values: FxHashMap<Name, ValueBinding<'ast>>,
    pub(crate) types: FxHashMap<Name, TypeBinding<'ast>>,
}

/// Everything a file declares at top level.
pub(crate) struct FileGlobals<'ast> {
    pub(crate) module: QualifiedName,
    pub(crate) values: FxHashMap<Name, ValueBinding<'ast>>,
    pub(crate) types: FxHashMap<Name, TypeBinding<'ast>>,
    /// `import ... as alias`, in import order. `None` when no file declares
    /// the imported module.
    pub(crate) imports: Vec<(Name, Option<usize>)>,
    /// Functions with a `this` parameter, in declaration order.
    pub(crate) extensions: Vec<&'ast FunctionDef>,
}

impl<'ast> FileGlobals<'ast> {
    /// Collect the globals of `file`. Imports are linked afterwards, once
    /// every file's module path is known.
    pub(crate) fn collect(file: &'ast SourceFile) -> Self {
        let mut globals = FileGlobals {
            module: file.module.clone(),
            values: FxHashMap::default(),
            types: FxHashMap::default(),
            imports: Vec::new(),
            extensions: Vec::new(),
        };
        for declaration in &file.declarations {
            match &declaration.kind {
                DeclarationKind::Function(def) if def.is_extension() => {
                    globals.extensions.push(def);
                }
                DeclarationKind::Function(def) => {
                    globals
                        .values
                        .insert(def.name.name(), ValueBinding::GlobalFunction(def));
                }
                DeclarationKind::ExternFunction(def) => {
                    globals
                        .values
                        .insert(def.binder.name(), ValueBinding::ExternFunction(def));
                }
                DeclarationKind::Struct(def) => {
                    globals
                        .values
                        .insert(def.binder.name(), ValueBinding::Struct(def));
                    globals
                        .types
                        .insert(def.binder.name(), TypeBinding::Struct(def));
                }
                DeclarationKind::Const(def) => {
                    globals
                        .values
                        .insert(def.name.name(), ValueBinding::GlobalConst(def));
                }
                DeclarationKind::ImportAs { .. } | DeclarationKind::Error => {}
            }
        }
        globals
    }

    pub(crate) fn import(&self, alias: Name) -> Option<usize> {
        self.imports
            .iter()
            .find_map(|(name, file)| (*name == alias).then_some(*file))
            .flatten()
    }
}
