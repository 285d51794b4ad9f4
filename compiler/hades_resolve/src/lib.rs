//! Name resolution for Hades.
//!
//! [`ScopeResolver`] implements the [`Resolver`] interface the type checker
//! consumes. It walks the program once up front and records, for every
//! identifier, `this` expression, module-qualified property and type path,
//! what it refers to. Queries afterwards are plain table lookups keyed by
//! location.
//!
//! # Scoping
//!
//! - File scope: functions, externs, structs, consts and import aliases.
//!   Forward references are allowed.
//! - Function scope: type parameters, then parameters.
//! - Block scope: `val` bindings, visible after their initializer.
//!
//! Extension functions (those with a `this` parameter) are not values; they
//! are only reachable through method-style property access.

mod scope;
mod walk;

use hades_ir::ast::{
    Declaration, DeclarationKind, Expression, FunctionDef, Identifier, Program, QualifiedPath,
    StructDef, ThisParam,
};
use hades_ir::{
    HasLocation, QualifiedName, Resolver, SourceLocation, TypeBinding, ValueBinding,
};
use rustc_hash::FxHashMap;
use tracing::debug;

use scope::FileGlobals;
use walk::Walker;

/// Resolution tables for one program.
pub struct ScopeResolver<'ast> {
    files: Vec<FileGlobals<'ast>>,
    /// Variable references, keyed by identifier location.
    values: FxHashMap<SourceLocation, ValueBinding<'ast>>,
    /// Type names, keyed by identifier location.
    types: FxHashMap<SourceLocation, TypeBinding<'ast>>,
    qualified_structs: FxHashMap<SourceLocation, &'ast StructDef>,
    /// `alias.name` property expressions, keyed by the property expression.
    module_properties: FxHashMap<SourceLocation, ValueBinding<'ast>>,
    this_params: FxHashMap<SourceLocation, &'ast ThisParam>,
    /// Extension candidates, keyed by the property identifier.
    extensions: FxHashMap<SourceLocation, Vec<&'ast FunctionDef>>,
    /// Enclosing top-level declaration of every node.
    containing: FxHashMap<SourceLocation, &'ast Declaration>,
    /// Index into `files` of the file declaring each struct.
    struct_files: FxHashMap<SourceLocation, usize>,
}

impl<'ast> ScopeResolver<'ast> {
    pub fn new(program: &'ast Program) -> Self {
        let mut files: Vec<FileGlobals<'ast>> =
            program.files.iter().map(FileGlobals::collect).collect();
        link_imports(program, &mut files);

        let mut resolver = ScopeResolver {
            files: Vec::new(),
            values: FxHashMap::default(),
            types: FxHashMap::default(),
            qualified_structs: FxHashMap::default(),
            module_properties: FxHashMap::default(),
            this_params: FxHashMap::default(),
            extensions: FxHashMap::default(),
            containing: FxHashMap::default(),
            struct_files: FxHashMap::default(),
        };

        for (index, file) in program.files.iter().enumerate() {
            for declaration in &file.declarations {
                if let DeclarationKind::Struct(def) = &declaration.kind {
                    resolver.struct_files.insert(def.binder.location(), index);
                }
                Walker::new(&mut resolver, &files, index, declaration).walk_declaration();
            }
        }
        debug!(
            files = files.len(),
            references = resolver.values.len(),
            "resolved program"
        );
        resolver.files = files;
        resolver
    }

    /// Number of resolved variable references.
    pub fn reference_count(&self) -> usize {
        self.values.len()
    }
}

fn link_imports<'ast>(program: &'ast Program, files: &mut [FileGlobals<'ast>]) {
    let modules: Vec<QualifiedName> = files.iter().map(|file| file.module.clone()).collect();
    for (file, globals) in program.files.iter().zip(files.iter_mut()) {
        for declaration in &file.declarations {
            if let DeclarationKind::ImportAs {
                module_path,
                as_name,
            } = &declaration.kind
            {
                let path = QualifiedName::new(
                    module_path.identifiers.iter().map(|id| id.name).collect(),
                );
                let target = modules.iter().position(|module| *module == path);
                globals.imports.push((as_name.name(), target));
            }
        }
    }
}

impl<'ast> Resolver<'ast> for ScopeResolver<'ast> {
    fn resolve(&self, name: &Identifier) -> Option<ValueBinding<'ast>> {
        self.values.get(&name.location).copied()
    }

    fn resolve_type_variable(&self, name: &Identifier) -> Option<TypeBinding<'ast>> {
        self.types.get(&name.location).copied()
    }

    fn resolve_qualified_struct_def(&self, path: &QualifiedPath) -> Option<&'ast StructDef> {
        self.qualified_structs.get(&path.location).copied()
    }

    fn resolve_module_property(&self, property: &Expression) -> Option<ValueBinding<'ast>> {
        self.module_properties.get(&property.location).copied()
    }

    fn declaration_containing(&self, location: SourceLocation) -> Option<&'ast Declaration> {
        self.containing.get(&location).copied()
    }

    fn resolve_this_param(&self, this: &Expression) -> Option<&'ast ThisParam> {
        self.this_params.get(&this.location).copied()
    }

    fn extension_defs_in_scope(&self, property: &Identifier) -> Vec<&'ast FunctionDef> {
        self.extensions
            .get(&property.location)
            .cloned()
            .unwrap_or_default()
    }

    fn qualified_struct_name(&self, def: &StructDef) -> QualifiedName {
        match self
            .struct_files
            .get(&def.binder.location())
            .and_then(|&file| self.files.get(file))
        {
            Some(file) => file.module.append(def.binder.name()),
            None => QualifiedName::single(def.binder.name()),
        }
    }
}
