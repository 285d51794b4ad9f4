//! The type checker.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Checker                            │
//! │  ┌────────────┐  ┌───────────┐  ┌────────────────────┐  │
//! │  │  Resolver  │  │  Unifier  │  │ memo tables keyed  │  │
//! │  │ (bindings) │  │ (?T → ty) │  │ by SourceLocation  │  │
//! │  └────────────┘  └───────────┘  └────────────────────┘  │
//! └─────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼ finish()
//!                     TypedProgram
//! ```
//!
//! Checking is bidirectional: `infer_expression` synthesizes a type,
//! `check_expression` verifies one against an expectation. Declarations are
//! typed lazily: a reference to a function, struct or const declares it on
//! first use, and every declare step is guarded by the binder-type table so
//! forward references and mutual recursion terminate.
//!
//! User errors never abort checking. They are recorded and the offending
//! node gets `Type::Error`, which is compatible with everything.

mod infer;
mod operators;
mod well_known;

use hades_ir::ast::{
    Binder, Block, ConstDef, Declaration, DeclarationKind, ExternFunctionDef, FunctionDef,
    Program, Statement, StatementKind, StructDef, TypeAnnotation, ValStatement,
};
use hades_ir::{HasLocation, Name, Resolver, SourceLocation, StringInterner};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::type_error::{TypeCheckError, TypeErrorKind};
use crate::unify::Unifier;
use crate::{Constructor, FunctionType, StructType, Type, TypeParam, TypedProgram};

use well_known::WellKnownNames;

type NodeMap<V> = FxHashMap<SourceLocation, V>;

pub struct Checker<'ast, 'r, R: Resolver<'ast> + ?Sized> {
    resolver: &'r R,
    well_known: WellKnownNames,

    binder_types: NodeMap<Type>,
    expression_types: NodeMap<Type>,
    annotation_types: NodeMap<Type>,
    type_arguments: NodeMap<Vec<Type>>,
    extension_defs: NodeMap<&'ast FunctionDef>,

    /// Field types per struct, keyed by the struct's binder location.
    struct_field_types: NodeMap<Vec<(Name, Type)>>,
    /// Struct declarations, keyed by the struct's binder location.
    struct_defs: NodeMap<&'ast StructDef>,
    /// Structs whose fields are being typed right now.
    declaring_structs: FxHashSet<SourceLocation>,

    return_types: Vec<Type>,
    unifier: Unifier,
    checked_vals: FxHashSet<SourceLocation>,
    checked_declarations: FxHashSet<SourceLocation>,
    errors: Vec<TypeCheckError>,
}

impl<'ast, 'r, R: Resolver<'ast> + ?Sized> Checker<'ast, 'r, R> {
    pub fn new(resolver: &'r R, interner: &StringInterner) -> Self {
        Checker {
            resolver,
            well_known: WellKnownNames::new(interner),
            binder_types: NodeMap::default(),
            expression_types: NodeMap::default(),
            annotation_types: NodeMap::default(),
            type_arguments: NodeMap::default(),
            extension_defs: NodeMap::default(),
            struct_field_types: NodeMap::default(),
            struct_defs: NodeMap::default(),
            declaring_structs: FxHashSet::default(),
            return_types: Vec::new(),
            unifier: Unifier::new(),
            checked_vals: FxHashSet::default(),
            checked_declarations: FxHashSet::default(),
            errors: Vec::new(),
        }
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Type of `expression`, checking its declaration first if needed.
    pub fn type_of_expression(&mut self, expression: &impl HasLocation) -> Type {
        let location = expression.location();
        self.lookup_or_check(location, |checker| checker.expression_types.get(&location))
    }

    pub fn annotation_to_type(&mut self, annotation: &TypeAnnotation) -> Type {
        let location = annotation.location;
        self.lookup_or_check(location, |checker| checker.annotation_types.get(&location))
    }

    pub fn type_of_binder(&mut self, binder: &Binder) -> Type {
        let location = binder.location();
        self.lookup_or_check(location, |checker| checker.binder_types.get(&location))
    }

    fn lookup_or_check(
        &mut self,
        location: SourceLocation,
        lookup: impl Fn(&Self) -> Option<&Type>,
    ) -> Type {
        if let Some(ty) = lookup(self) {
            return ty.clone();
        }
        let Some(declaration) = self.resolver.declaration_containing(location) else {
            panic!("internal error: no declaration contains {location:?}");
        };
        self.check_declaration(declaration);
        match lookup(self) {
            Some(ty) => ty.clone(),
            None => panic!("internal error: checking the enclosing declaration did not type {location:?}"),
        }
    }

    /// Type arguments inferred for a generic call, or for its callee.
    pub fn get_type_args(&self, node: &impl HasLocation) -> Option<&[Type]> {
        self.type_arguments.get(&node.location()).map(Vec::as_slice)
    }

    /// Extension function a property expression resolved to.
    pub fn get_extension_def(&self, property: &impl HasLocation) -> Option<&'ast FunctionDef> {
        self.extension_defs.get(&property.location()).copied()
    }

    pub fn type_of_struct_instance(&mut self, def: &'ast StructDef) -> Type {
        let location = def.binder.location();
        if self.declaring_structs.contains(&location) {
            return self.struct_instance_shell(def);
        }
        self.declare_struct(def);
        match self.binder_types.get(&location) {
            Some(Type::Function(constructor)) => constructor.to.clone(),
            other => unreachable!("internal error: struct constructor typed as {other:?}"),
        }
    }

    /// Field types of `def` in declaration order, before any substitution.
    pub fn type_of_struct_members(&mut self, def: &'ast StructDef) -> Vec<(Name, Type)> {
        self.declare_struct(def);
        self.struct_field_types
            .get(&def.binder.location())
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_type_equal(&self, a: &Type, b: &Type) -> bool {
        Unifier::is_type_equal(a, b)
    }

    /// Assignability against the checker's unification store.
    pub fn is_assignable_to(&mut self, source: &Type, destination: &Type) -> bool {
        self.unifier.is_assignable_to(source, destination)
    }

    pub fn errors(&self) -> &[TypeCheckError] {
        &self.errors
    }

    /// Snapshot every memo table along with the collected errors.
    pub fn finish(self) -> TypedProgram<'ast> {
        TypedProgram {
            expression_types: self.expression_types,
            binder_types: self.binder_types,
            annotation_types: self.annotation_types,
            type_arguments: self.type_arguments,
            extension_defs: self.extension_defs,
            errors: self.errors,
        }
    }

    // ── Declarations ────────────────────────────────────────────────

    pub fn check_program(&mut self, program: &'ast Program) {
        for file in &program.files {
            for declaration in &file.declarations {
                self.check_declaration(declaration);
            }
        }
    }

    /// Check one declaration. Checking the same declaration again is a no-op.
    #[tracing::instrument(level = "debug", skip_all, fields(location = ?declaration.location))]
    pub fn check_declaration(&mut self, declaration: &'ast Declaration) {
        if !self.checked_declarations.insert(declaration.location) {
            return;
        }
        match &declaration.kind {
            DeclarationKind::Function(def) => self.check_function_def(def),
            DeclarationKind::ExternFunction(def) => self.declare_extern_function_def(def),
            DeclarationKind::Struct(def) => self.declare_struct(def),
            DeclarationKind::Const(def) => self.declare_global_const(def),
            DeclarationKind::ImportAs { .. } | DeclarationKind::Error => {}
        }
    }

    fn check_function_def(&mut self, def: &'ast FunctionDef) {
        let function_type = self.declare_function_def(def);
        self.return_types.push(function_type.to);
        self.check_block(&def.body);
        let popped = self.return_types.pop();
        debug_assert!(popped.is_some(), "return type stack underflow");
    }

    fn declare_function_def(&mut self, def: &'ast FunctionDef) -> FunctionType {
        if let Some(cached) = self.binder_types.get(&def.name.location()) {
            return match cached {
                Type::Function(f) => (**f).clone(),
                other => unreachable!("internal error: function binder typed as {other:?}"),
            };
        }

        let mut from = Vec::with_capacity(def.params.len());
        for param in &def.params {
            let ty = match &param.annotation {
                Some(annotation) => self.infer_annotation(annotation, false),
                None => Type::Error,
            };
            self.bind_value(&param.binder, ty.clone());
            from.push(ty);
        }
        let receiver = def
            .this_param
            .as_ref()
            .map(|this| self.infer_annotation(&this.annotation, false));
        let to = self.infer_annotation(&def.return_type, false);

        let function_type = FunctionType {
            receiver,
            type_params: def
                .type_params
                .as_ref()
                .map(|params| params.iter().map(TypeParam::from).collect()),
            from,
            to,
        };
        self.bind_value(&def.name, Type::function(function_type.clone()));
        function_type
    }

    fn declare_extern_function_def(&mut self, def: &'ast ExternFunctionDef) {
        if self.binder_types.contains_key(&def.binder.location()) {
            return;
        }
        let from = def
            .param_types
            .iter()
            .map(|annotation| self.infer_annotation(annotation, false))
            .collect();
        let to = self.infer_annotation(&def.return_type, false);
        self.bind_value(&def.binder, Type::function(FunctionType::plain(from, to)));
    }

    fn declare_global_const(&mut self, def: &'ast ConstDef) {
        if self.binder_types.contains_key(&def.name.location()) {
            return;
        }
        // A const whose initializer refers back to it sees `Error`.
        self.bind_value(&def.name, Type::Error);
        let ty = match &def.annotation {
            Some(annotation) => {
                let expected = self.infer_annotation(annotation, false);
                self.check_expression(&expected, &def.initializer);
                expected
            }
            None => self.infer_expression(&def.initializer),
        };
        if !matches!(ty, Type::CInt | Type::Bool | Type::Size | Type::Error) {
            self.error(def.initializer.location, TypeErrorKind::NotAConst);
        }
        self.bind_value(&def.name, ty);
    }

    fn declare_struct(&mut self, def: &'ast StructDef) {
        let location = def.binder.location();
        if self.binder_types.contains_key(&location) || self.declaring_structs.contains(&location) {
            return;
        }
        self.struct_defs.insert(location, def);
        self.declaring_structs.insert(location);

        let mut fields: Vec<(Name, Type)> = Vec::with_capacity(def.members.len());
        for member in &def.members {
            let ty = self.infer_annotation(&member.annotation, false);
            let name = member.binder.name();
            assert!(
                fields.iter().all(|(existing, _)| *existing != name),
                "internal error: duplicate field at {:?}",
                member.binder.location()
            );
            fields.push((name, ty));
        }
        self.declaring_structs.remove(&location);

        let type_params: Option<Vec<TypeParam>> = def
            .type_params
            .as_ref()
            .map(|params| params.iter().map(TypeParam::from).collect());
        let constructor = self.struct_constructor(def);
        let instance_type = match &type_params {
            Some(params) => Type::Application {
                callee: Box::new(Type::Constructor(constructor)),
                args: params.iter().map(Type::param_ref).collect(),
            },
            None => Type::Struct(Box::new(StructType {
                constructor,
                member_types: fields.clone(),
            })),
        };
        let constructor_type = FunctionType {
            receiver: None,
            type_params,
            from: fields.iter().map(|(_, ty)| ty.clone()).collect(),
            to: instance_type,
        };

        debug!(fields = fields.len(), "declared struct");
        self.struct_field_types.insert(location, fields);
        self.bind_value(&def.binder, Type::function(constructor_type));
    }

    fn struct_constructor(&self, def: &StructDef) -> Constructor {
        Constructor {
            binder: Some(def.binder),
            name: self.resolver.qualified_struct_name(def),
            params: def
                .type_params
                .as_ref()
                .map(|params| params.iter().map(TypeParam::from).collect()),
        }
    }

    /// Instance type of a struct still being declared: identity without
    /// member types.
    fn struct_instance_shell(&self, def: &StructDef) -> Type {
        let constructor = self.struct_constructor(def);
        match &constructor.params {
            Some(params) => {
                let args = params.iter().map(Type::param_ref).collect();
                Type::Application {
                    callee: Box::new(Type::Constructor(constructor)),
                    args,
                }
            }
            None => Type::Struct(Box::new(StructType {
                constructor,
                member_types: Vec::new(),
            })),
        }
    }

    // ── Statements ──────────────────────────────────────────────────

    fn check_block(&mut self, block: &'ast Block) {
        for member in &block.members {
            self.check_statement(member);
        }
    }

    fn check_statement(&mut self, statement: &'ast Statement) {
        match &statement.kind {
            StatementKind::Val(val) => self.check_val_statement(val),
            StatementKind::Return(value) => {
                let Some(return_type) = self.return_types.last().cloned() else {
                    unreachable!("internal error: return outside a function body");
                };
                self.check_expression(&return_type, value);
            }
            StatementKind::Expression(expression) => {
                self.infer_expression(expression);
            }
            StatementKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.check_expression(&Type::Bool, condition);
                self.check_block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_block(else_branch);
                }
            }
            StatementKind::While { condition, body } => {
                self.check_expression(&Type::Bool, condition);
                self.check_block(body);
            }
            StatementKind::Error => {}
        }
    }

    fn check_val_statement(&mut self, val: &'ast ValStatement) {
        if self.checked_vals.contains(&val.location) {
            return;
        }
        let ty = match &val.annotation {
            Some(annotation) => {
                let expected = self.infer_annotation(annotation, false);
                self.check_expression(&expected, &val.rhs);
                expected
            }
            None => self.infer_expression(&val.rhs),
        };
        self.bind_value(&val.binder, ty);
        self.checked_vals.insert(val.location);
    }

    // ── Helpers ─────────────────────────────────────────────────────

    fn bind_value(&mut self, binder: &Binder, ty: Type) {
        self.binder_types.insert(binder.location(), ty);
    }

    fn error(&mut self, location: SourceLocation, kind: TypeErrorKind) {
        debug!(?location, ?kind, "type error");
        self.errors.push(TypeCheckError::new(location, kind));
    }
}

#[cfg(test)]
mod tests;
