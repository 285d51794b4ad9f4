//! The resolution walk over one top-level declaration.

use hades_ir::ast::{
    Binder, Block, Declaration, DeclarationKind, ExprKind, Expression, FunctionDef, Identifier,
    QualifiedPath, Statement, StatementKind, StructDef, ThisParam, TypeAnnotation,
    TypeAnnotationKind,
};
use hades_ir::{HasLocation, Name, SourceLocation, TypeBinding, ValueBinding};

use crate::scope::{FileGlobals, Scope};
use crate::ScopeResolver;

pub(crate) struct Walker<'ast, 'a> {
    tables: &'a mut ScopeResolver<'ast>,
    files: &'a [FileGlobals<'ast>],
    file: usize,
    declaration: &'ast Declaration,
    scopes: Vec<Scope<'ast>>,
    this_param: Option<&'ast ThisParam>,
}

impl<'ast, 'a> Walker<'ast, 'a> {
    pub(crate) fn new(
        tables: &'a mut ScopeResolver<'ast>,
        files: &'a [FileGlobals<'ast>],
        file: usize,
        declaration: &'ast Declaration,
    ) -> Self {
        Walker {
            tables,
            files,
            file,
            declaration,
            scopes: Vec::new(),
            this_param: None,
        }
    }

    pub(crate) fn walk_declaration(mut self) {
        let declaration = self.declaration;
        self.record(declaration.location);
        match &declaration.kind {
            DeclarationKind::Function(def) => self.walk_function(def),
            DeclarationKind::ExternFunction(def) => {
                self.record_binder(&def.binder);
                self.record(def.extern_name.location);
                for annotation in &def.param_types {
                    self.walk_annotation(annotation);
                }
                self.walk_annotation(&def.return_type);
            }
            DeclarationKind::Struct(def) => self.walk_struct(def),
            DeclarationKind::Const(def) => {
                self.record_binder(&def.name);
                if let Some(annotation) = &def.annotation {
                    self.walk_annotation(annotation);
                }
                self.walk_expression(&def.initializer);
            }
            DeclarationKind::ImportAs {
                module_path,
                as_name,
            } => {
                self.record(module_path.location);
                self.record_binder(as_name);
            }
            DeclarationKind::Error => {}
        }
    }

    fn walk_function(&mut self, def: &'ast FunctionDef) {
        self.record_binder(&def.name);
        let mut scope = Scope::default();
        for param in def.type_params.iter().flatten() {
            self.record_binder(&param.binder);
            scope
                .types
                .insert(param.binder.name(), TypeBinding::TypeParam(param));
        }
        self.scopes.push(scope);

        if let Some(this) = &def.this_param {
            self.record(this.location);
            self.walk_annotation(&this.annotation);
            self.this_param = Some(this);
        }
        for param in &def.params {
            self.record(param.location);
            self.record_binder(&param.binder);
            if let Some(annotation) = &param.annotation {
                self.walk_annotation(annotation);
            }
            self.bind_value(
                param.binder.name(),
                ValueBinding::FunctionParam {
                    function: def,
                    param,
                },
            );
        }
        self.walk_annotation(&def.return_type);
        self.walk_block(&def.body);

        self.this_param = None;
        self.scopes.pop();
    }

    fn walk_struct(&mut self, def: &'ast StructDef) {
        self.record_binder(&def.binder);
        let mut scope = Scope::default();
        for param in def.type_params.iter().flatten() {
            self.record_binder(&param.binder);
            scope
                .types
                .insert(param.binder.name(), TypeBinding::TypeParam(param));
        }
        self.scopes.push(scope);
        for member in &def.members {
            self.record_binder(&member.binder);
            self.walk_annotation(&member.annotation);
        }
        self.scopes.pop();
    }

    // ── Statements ─────────────────────────────────────────────────

    fn walk_block(&mut self, block: &'ast Block) {
        self.record(block.location);
        self.scopes.push(Scope::default());
        for statement in &block.members {
            self.walk_statement(statement);
        }
        self.scopes.pop();
    }

    fn walk_statement(&mut self, statement: &'ast Statement) {
        self.record(statement.location);
        match &statement.kind {
            StatementKind::Val(val) => {
                if let Some(annotation) = &val.annotation {
                    self.walk_annotation(annotation);
                }
                self.walk_expression(&val.rhs);
                self.record_binder(&val.binder);
                self.bind_value(val.binder.name(), ValueBinding::ValBinding(val));
            }
            StatementKind::Return(value) | StatementKind::Expression(value) => {
                self.walk_expression(value);
            }
            StatementKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.walk_expression(condition);
                self.walk_block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.walk_block(else_branch);
                }
            }
            StatementKind::While { condition, body } => {
                self.walk_expression(condition);
                self.walk_block(body);
            }
            StatementKind::Error => {}
        }
    }

    // ── Expressions ────────────────────────────────────────────────

    fn walk_expression(&mut self, expression: &'ast Expression) {
        self.record(expression.location);
        match &expression.kind {
            ExprKind::Var(name) => self.resolve_var(name),
            ExprKind::Call { callee, args } => {
                self.walk_expression(callee);
                for arg in args {
                    self.walk_expression(arg);
                }
            }
            ExprKind::Property { lhs, property } => {
                self.record(property.location);
                if !self.resolve_module_property(expression, lhs, property) {
                    self.walk_expression(lhs);
                    self.collect_extensions(property);
                }
            }
            ExprKind::This => {
                if let Some(this) = self.this_param {
                    self.tables.this_params.insert(expression.location, this);
                }
            }
            ExprKind::Not(operand) | ExprKind::AddressOf(operand) | ExprKind::Load(operand) => {
                self.walk_expression(operand);
            }
            ExprKind::BinaryOperation { lhs, rhs, .. } => {
                self.walk_expression(lhs);
                self.walk_expression(rhs);
            }
            ExprKind::SizeOf(annotation) => self.walk_annotation(annotation),
            ExprKind::PointerCast { to, arg } => {
                self.walk_annotation(to);
                self.walk_expression(arg);
            }
            ExprKind::ByteString(_)
            | ExprKind::BoolLiteral(_)
            | ExprKind::IntLiteral(_)
            | ExprKind::NullPtr
            | ExprKind::Error => {}
        }
    }

    fn resolve_var(&mut self, name: &Identifier) {
        self.record(name.location);
        if let Some(binding) = self.lookup_value(name.name) {
            self.tables.values.insert(name.location, binding);
        }
    }

    /// `alias.name` where `alias` is an import not shadowed by any value.
    fn resolve_module_property(
        &mut self,
        expression: &Expression,
        lhs: &Expression,
        property: &Identifier,
    ) -> bool {
        let ExprKind::Var(alias) = &lhs.kind else {
            return false;
        };
        if self.lookup_value(alias.name).is_some() {
            return false;
        }
        let Some(target) = self.current_file().import(alias.name) else {
            return false;
        };
        let Some(binding) = self
            .files
            .get(target)
            .and_then(|file| file.values.get(&property.name))
            .copied()
        else {
            return false;
        };
        self.record(lhs.location);
        self.record(alias.location);
        self.tables
            .module_properties
            .insert(expression.location, binding);
        true
    }

    /// Functions named like `property` with a `this` parameter: those of the
    /// current file first, then those of each imported file in import order.
    fn collect_extensions(&mut self, property: &Identifier) {
        let files = self.files;
        let current = self.current_file();
        let imported = current
            .imports
            .iter()
            .filter_map(|(_, file)| (*file).and_then(|index| files.get(index)));
        let candidates: Vec<&'ast FunctionDef> = std::iter::once(current)
            .chain(imported)
            .flat_map(|file| file.extensions.iter().copied())
            .filter(|def| def.name.name() == property.name)
            .collect();
        if !candidates.is_empty() {
            self.tables.extensions.insert(property.location, candidates);
        }
    }

    // ── Type annotations ───────────────────────────────────────────

    fn walk_annotation(&mut self, annotation: &'ast TypeAnnotation) {
        self.record(annotation.location);
        match &annotation.kind {
            TypeAnnotationKind::Var(name) => {
                self.record(name.location);
                if let Some(binding) = self.lookup_type(name.name) {
                    self.tables.types.insert(name.location, binding);
                }
            }
            TypeAnnotationKind::Qualified(path) => self.resolve_qualified_path(path),
            TypeAnnotationKind::Ptr(to) | TypeAnnotationKind::MutPtr(to) => {
                self.walk_annotation(to);
            }
            TypeAnnotationKind::Application { callee, args } => {
                self.walk_annotation(callee);
                for arg in args {
                    self.walk_annotation(arg);
                }
            }
            TypeAnnotationKind::FunctionPtr { from, to } => {
                for param in from {
                    self.walk_annotation(param);
                }
                self.walk_annotation(to);
            }
            TypeAnnotationKind::Error => {}
        }
    }

    /// `alias.Struct` in type position.
    fn resolve_qualified_path(&mut self, path: &QualifiedPath) {
        self.record(path.location);
        for identifier in &path.identifiers {
            self.record(identifier.location);
        }
        let [alias, name] = path.identifiers.as_slice() else {
            return;
        };
        let def = self
            .current_file()
            .import(alias.name)
            .and_then(|target| self.files.get(target))
            .and_then(|file| file.types.get(&name.name));
        if let Some(TypeBinding::Struct(def)) = def {
            self.tables.qualified_structs.insert(path.location, def);
        }
    }

    // ── Scopes ─────────────────────────────────────────────────────

    fn current_file(&self) -> &'a FileGlobals<'ast> {
        let files: &'a [FileGlobals<'ast>] = self.files;
        &files[self.file]
    }

    fn bind_value(&mut self, name: Name, binding: ValueBinding<'ast>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.values.insert(name, binding);
        }
    }

    fn lookup_value(&self, name: Name) -> Option<ValueBinding<'ast>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.values.get(&name))
            .or_else(|| self.current_file().values.get(&name))
            .copied()
    }

    fn lookup_type(&self, name: Name) -> Option<TypeBinding<'ast>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.types.get(&name))
            .or_else(|| self.current_file().types.get(&name))
            .copied()
    }

    fn record_binder(&mut self, binder: &Binder) {
        self.record(binder.location());
    }

    fn record(&mut self, location: SourceLocation) {
        self.tables.containing.insert(location, self.declaration);
    }
}
