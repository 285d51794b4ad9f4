//! Inference and checking of annotations and expressions.

use hades_ir::ast::{
    Binder, BinaryOperator, ExprKind, Expression, FunctionDef, Identifier, StructDef,
    TypeAnnotation, TypeAnnotationKind,
};
use hades_ir::{HasLocation, Name, Resolver, SourceLocation, TypeBinding, ValueBinding};
use hades_stack::ensure_sufficient_stack;

use super::operators::binary_operator_rule;
use super::Checker;
use crate::type_error::TypeErrorKind;
use crate::unify::Unifier;
use crate::{Constructor, FunctionType, StructType, Substitution, Type};

impl<'ast, 'r, R: Resolver<'ast> + ?Sized> Checker<'ast, 'r, R> {
    // ── Annotations ─────────────────────────────────────────────────

    /// Type written by `annotation`. A generic struct named without
    /// arguments is an error unless `allow_incomplete` is set, which is the
    /// case for the callee of a type application.
    pub(super) fn infer_annotation(
        &mut self,
        annotation: &TypeAnnotation,
        allow_incomplete: bool,
    ) -> Type {
        let ty = match &annotation.kind {
            TypeAnnotationKind::Error => Type::Error,
            TypeAnnotationKind::Var(name) => match self.well_known.primitive(name.name) {
                Some(primitive) => primitive,
                None => match self.resolve_type_variable(name) {
                    Some(ty) => ty,
                    None => {
                        self.error(annotation.location, TypeErrorKind::UnboundType(name.name));
                        Type::Error
                    }
                },
            },
            TypeAnnotationKind::Qualified(path) => {
                match self.resolver.resolve_qualified_struct_def(path) {
                    Some(def) => self.struct_type_reference(def),
                    None => {
                        let name = path.identifiers.last().map_or(Name::EMPTY, |id| id.name);
                        self.error(annotation.location, TypeErrorKind::UnboundType(name));
                        Type::Error
                    }
                }
            }
            TypeAnnotationKind::Ptr(to) => Type::ptr(self.infer_annotation(to, false)),
            TypeAnnotationKind::MutPtr(to) => Type::mut_ptr(self.infer_annotation(to, false)),
            TypeAnnotationKind::Application { callee, args } => {
                let callee_type = self.infer_annotation(callee, true);
                let args: Vec<Type> = args
                    .iter()
                    .map(|arg| self.infer_annotation(arg, false))
                    .collect();
                self.check_type_application(annotation.location, &callee_type, args.len());
                if callee_type.is_error() {
                    Type::Error
                } else {
                    Type::Application {
                        callee: Box::new(callee_type),
                        args,
                    }
                }
            }
            TypeAnnotationKind::FunctionPtr { from, to } => {
                let from = from
                    .iter()
                    .map(|param| self.infer_annotation(param, false))
                    .collect();
                let to = self.infer_annotation(to, false);
                Type::ptr(Type::function(FunctionType::plain(from, to)))
            }
        };

        self.annotation_types.insert(annotation.location, ty.clone());
        if !allow_incomplete {
            if let Type::Constructor(Constructor {
                params: Some(params),
                ..
            }) = &ty
            {
                self.error(
                    annotation.location,
                    TypeErrorKind::IncompleteType {
                        missing_param_count: params.len(),
                    },
                );
            }
        }
        ty
    }

    fn resolve_type_variable(&mut self, name: &Identifier) -> Option<Type> {
        match self.resolver.resolve_type_variable(name)? {
            TypeBinding::Struct(def) => Some(self.struct_type_reference(def)),
            TypeBinding::TypeParam(decl) => Some(Type::ParamRef(decl.binder)),
        }
    }

    /// A struct named in type position: the instance type for a plain struct,
    /// the bare constructor for a generic one.
    fn struct_type_reference(&mut self, def: &'ast StructDef) -> Type {
        if def.type_params.is_none() {
            return self.type_of_struct_instance(def);
        }
        self.struct_defs.insert(def.binder.location(), def);
        Type::Constructor(self.struct_constructor(def))
    }

    fn check_type_application(&mut self, location: SourceLocation, callee: &Type, arg_count: usize) {
        match callee {
            Type::Error => {}
            Type::Constructor(Constructor {
                params: Some(params),
                ..
            }) => {
                if arg_count < params.len() {
                    self.error(
                        location,
                        TypeErrorKind::IncompleteType {
                            missing_param_count: params.len() - arg_count,
                        },
                    );
                } else if arg_count > params.len() {
                    self.error(
                        location,
                        TypeErrorKind::TooManyArgs {
                            required: params.len(),
                        },
                    );
                }
            }
            other => self.error(location, TypeErrorKind::TypeNotCallable(other.clone())),
        }
    }

    // ── Expressions ─────────────────────────────────────────────────

    /// Synthesize the type of `expression` and record it.
    pub(super) fn infer_expression(&mut self, expression: &'ast Expression) -> Type {
        let ty = ensure_sufficient_stack(|| self.infer_expression_kind(expression));
        self.expression_types.insert(expression.location, ty.clone());
        ty
    }

    fn infer_expression_kind(&mut self, expression: &'ast Expression) -> Type {
        match &expression.kind {
            ExprKind::Error => Type::Error,
            ExprKind::Var(name) => self.infer_var(name),
            ExprKind::Call { callee, args } => self.infer_call(expression, callee, args),
            ExprKind::Property { lhs, property } => {
                self.infer_property(expression, lhs, property)
            }
            ExprKind::ByteString(_) => Type::ptr(Type::Byte),
            ExprKind::BoolLiteral(_) => Type::Bool,
            ExprKind::IntLiteral(_) => Type::CInt,
            ExprKind::NullPtr => {
                self.error(expression.location, TypeErrorKind::AmbiguousExpression);
                Type::ptr(Type::Error)
            }
            ExprKind::This => match self.resolver.resolve_this_param(expression) {
                Some(this) => self.infer_annotation(&this.annotation, false),
                None => {
                    self.error(expression.location, TypeErrorKind::UnboundThis);
                    Type::Error
                }
            },
            ExprKind::Not(operand) => {
                self.check_expression(&Type::Bool, operand);
                Type::Bool
            }
            ExprKind::BinaryOperation { lhs, operator, rhs } => {
                self.infer_binary_operation(expression.location, lhs, *operator, rhs)
            }
            ExprKind::SizeOf(annotation) => {
                self.infer_annotation(annotation, false);
                Type::Size
            }
            ExprKind::AddressOf(operand) => {
                let ty = self.infer_expression(operand);
                if self.check_lvalue(operand) {
                    Type::mut_ptr(ty)
                } else {
                    Type::ptr(ty)
                }
            }
            ExprKind::Load(operand) => match self.infer_expression(operand) {
                Type::RawPtr { to, .. } => *to,
                Type::Error => Type::Error,
                other => {
                    self.error(operand.location, TypeErrorKind::NotAPointerType(other));
                    Type::Error
                }
            },
            ExprKind::PointerCast { to, arg } => {
                let to = Box::new(self.infer_annotation(to, false));
                match self.infer_expression(arg) {
                    Type::RawPtr { is_mutable, .. } => Type::RawPtr { to, is_mutable },
                    Type::Error => Type::RawPtr {
                        to,
                        is_mutable: false,
                    },
                    other => {
                        self.error(expression.location, TypeErrorKind::NotAPointerType(other));
                        Type::RawPtr {
                            to,
                            is_mutable: false,
                        }
                    }
                }
            }
        }
    }

    /// Verify `expression` against `expected`, recording its type.
    pub(super) fn check_expression(&mut self, expected: &Type, expression: &'ast Expression) {
        let expected = self.unifier.apply_instantiations(expected);
        match (&expression.kind, &expected) {
            (ExprKind::NullPtr, Type::RawPtr { .. }) => {
                self.expression_types.insert(expression.location, expected.clone());
            }
            (ExprKind::IntLiteral(_), Type::Size) => {
                self.expression_types.insert(expression.location, Type::Size);
            }
            _ => {
                let found = self.infer_expression(expression);
                if !self.unifier.is_assignable_to(&found, &expected) {
                    let source = self.unifier.apply_instantiations(&found);
                    let destination = self.unifier.apply_instantiations(&expected);
                    self.error(
                        expression.location,
                        TypeErrorKind::TypeNotAssignable {
                            source,
                            destination,
                        },
                    );
                }
            }
        }
    }

    fn infer_var(&mut self, name: &Identifier) -> Type {
        match self.resolver.resolve(name) {
            Some(binding) => self.infer_binding(binding),
            None => {
                self.error(name.location, TypeErrorKind::UnboundVariable(name.name));
                Type::Error
            }
        }
    }

    /// Type of whatever a name is bound to, declaring it first if needed.
    /// Global functions are values of pointer-to-function type.
    fn infer_binding(&mut self, binding: ValueBinding<'ast>) -> Type {
        match binding {
            ValueBinding::GlobalFunction(def) => {
                Type::ptr(Type::function(self.declare_function_def(def)))
            }
            ValueBinding::ExternFunction(def) => {
                self.declare_extern_function_def(def);
                self.declared_type(&def.binder)
            }
            ValueBinding::FunctionParam { function, param } => {
                self.declare_function_def(function);
                self.declared_type(&param.binder)
            }
            ValueBinding::ValBinding(val) => {
                self.check_val_statement(val);
                self.declared_type(&val.binder)
            }
            ValueBinding::Struct(def) => {
                self.declare_struct(def);
                self.declared_type(&def.binder)
            }
            ValueBinding::GlobalConst(def) => {
                self.declare_global_const(def);
                self.declared_type(&def.name)
            }
        }
    }

    fn declared_type(&self, binder: &Binder) -> Type {
        match self.binder_types.get(&binder.location()) {
            Some(ty) => ty.clone(),
            None => panic!("internal error: binder at {:?} was never declared", binder.location()),
        }
    }

    fn infer_binary_operation(
        &mut self,
        location: SourceLocation,
        lhs: &'ast Expression,
        operator: BinaryOperator,
        rhs: &'ast Expression,
    ) -> Type {
        let lhs_type = self.infer_expression(lhs);
        if operator.is_equality() {
            // Pointers compare regardless of mutability.
            let expected = match &lhs_type {
                Type::RawPtr { to, .. } => Type::ptr((**to).clone()),
                other => other.clone(),
            };
            self.check_expression(&expected, rhs);
            if !lhs_type.is_error() && !lhs_type.is_equality_comparable() {
                self.error(location, TypeErrorKind::TypeNotEqualityComparable(lhs_type));
            }
            return Type::Bool;
        }
        match binary_operator_rule(operator, &lhs_type) {
            Some((rhs_type, result_type)) => {
                self.check_expression(&rhs_type, rhs);
                result_type
            }
            None => {
                self.infer_expression(rhs);
                if !lhs_type.is_error() {
                    self.error(location, TypeErrorKind::OperatorNotApplicable(operator));
                }
                Type::Error
            }
        }
    }

    /// Only a `val` binding, or a field of one, has an address.
    fn check_lvalue(&mut self, expression: &Expression) -> bool {
        let root = match &expression.kind {
            ExprKind::Var(name) => Some(name),
            ExprKind::Property { lhs, .. } => match &lhs.kind {
                ExprKind::Var(name) => Some(name),
                _ => None,
            },
            _ => None,
        };
        let addressable = root.is_some_and(|name| {
            matches!(self.resolver.resolve(name), Some(ValueBinding::ValBinding(_)))
        });
        if !addressable {
            self.error(expression.location, TypeErrorKind::NotAnAddressableValue);
        }
        addressable
    }

    // ── Calls ───────────────────────────────────────────────────────

    fn infer_call(
        &mut self,
        call: &'ast Expression,
        callee: &'ast Expression,
        args: &'ast [Expression],
    ) -> Type {
        let callee_type = self.infer_expression(callee);
        let Some(function_type) = callee_type.as_callable().cloned() else {
            for arg in args {
                self.infer_expression(arg);
            }
            if !callee_type.is_error() {
                self.error(call.location, TypeErrorKind::TypeNotCallable(callee_type));
            }
            return Type::Error;
        };
        // A method value taken out of its property access has no receiver.
        let receiver_lhs = match (&function_type.receiver, &callee.kind) {
            (None, _) => None,
            (Some(receiver), ExprKind::Property { lhs, .. }) => Some((receiver, lhs.as_ref())),
            (Some(_), _) => {
                for arg in args {
                    self.infer_expression(arg);
                }
                self.error(call.location, TypeErrorKind::TypeNotCallable(callee_type));
                return Type::Error;
            }
        };

        let mut substitution = Substitution::new();
        let mut instances = Vec::new();
        for param in function_type.type_params.iter().flatten() {
            let instance = self.unifier.fresh_instance(param.binder);
            substitution.insert(param.location(), Type::GenericInstance(instance));
            instances.push(instance);
        }

        if let Some((receiver, lhs)) = receiver_lhs {
            self.check_expression(&receiver.apply_substitution(&substitution), lhs);
        }

        let required = function_type.from.len();
        for (expected, arg) in function_type.from.iter().zip(args) {
            self.check_expression(&expected.apply_substitution(&substitution), arg);
        }
        if required > args.len() {
            self.error(call.location, TypeErrorKind::MissingArgs { required });
        } else if required < args.len() {
            self.error(call.location, TypeErrorKind::TooManyArgs { required });
            for arg in &args[required..] {
                self.infer_expression(arg);
            }
        }

        if function_type.type_params.is_some() {
            let mut type_args = Vec::with_capacity(instances.len());
            for instance in instances {
                if self.unifier.resolution(instance).is_none() {
                    let location = args.first().map_or(call.location, |arg| arg.location);
                    self.error(location, TypeErrorKind::UninferrableTypeParam(instance.binder));
                    self.unifier.bind_if_unresolved(instance, Type::Error);
                }
                type_args.push(
                    self.unifier
                        .apply_instantiations(&Type::GenericInstance(instance)),
                );
            }
            self.type_arguments.insert(call.location, type_args.clone());
            self.type_arguments.insert(callee.location, type_args);
        }

        if matches!(callee.kind, ExprKind::Property { .. }) {
            self.apply_instantiations_to(callee);
        }
        for arg in args {
            self.apply_instantiations_to(arg);
        }

        self.unifier
            .apply_instantiations(&function_type.to.apply_substitution(&substitution))
    }

    fn apply_instantiations_to(&mut self, expression: &'ast Expression) {
        let ty = match self.expression_types.get(&expression.location) {
            Some(ty) => ty.clone(),
            None => self.infer_expression(expression),
        };
        let resolved = self.unifier.apply_instantiations(&ty);
        self.expression_types.insert(expression.location, resolved);
    }

    // ── Properties ──────────────────────────────────────────────────

    fn infer_property(
        &mut self,
        expression: &'ast Expression,
        lhs: &'ast Expression,
        property: &Identifier,
    ) -> Type {
        if let Some(binding) = self.resolver.resolve_module_property(expression) {
            return self.infer_binding(binding);
        }

        let lhs_type = self.infer_expression(lhs);
        let own_field = match &lhs_type {
            Type::Error => Some(Type::Error),
            Type::Struct(struct_type) => self.struct_field_type(struct_type, property.name),
            Type::Application { callee, args } => {
                self.application_field_type(callee, args, property.name)
            }
            _ => None,
        };
        if let Some(ty) = own_field {
            return ty;
        }

        if let Some(ty) = self.infer_extension_property(expression, &lhs_type, property) {
            return ty;
        }
        self.error(
            property.location,
            TypeErrorKind::NoSuchProperty {
                ty: lhs_type,
                property: property.name,
            },
        );
        Type::Error
    }

    fn struct_field_type(&self, struct_type: &StructType, field: Name) -> Option<Type> {
        let declared = struct_type
            .constructor
            .binder
            .and_then(|binder| self.struct_field_types.get(&binder.location()))
            .and_then(|fields| fields.iter().find(|(name, _)| *name == field));
        match declared {
            Some((_, ty)) => Some(ty.clone()),
            None => struct_type.member(field).cloned(),
        }
    }

    /// Field of a generic struct instance, with the struct's parameters
    /// replaced by the applied arguments. A missing argument becomes `Error`.
    fn application_field_type(&mut self, callee: &Type, args: &[Type], field: Name) -> Option<Type> {
        let Type::Constructor(Constructor {
            binder: Some(binder),
            ..
        }) = callee
        else {
            return None;
        };
        let def = *self.struct_defs.get(&binder.location())?;
        let params = def.type_params.as_ref()?;
        let field_type = self
            .type_of_struct_members(def)
            .into_iter()
            .find_map(|(name, ty)| (name == field).then_some(ty))?;

        let substitution: Substitution = params
            .iter()
            .enumerate()
            .map(|(index, param)| {
                let arg = args.get(index).cloned().unwrap_or(Type::Error);
                (param.binder.location(), arg)
            })
            .collect();
        Some(field_type.apply_substitution(&substitution))
    }

    /// First in-scope extension whose receiver accepts `lhs_type`. An exact
    /// receiver match, or a mutable pointer where the receiver is an
    /// immutable one, is taken as is; a generic receiver is unified against
    /// `lhs_type` with fresh instances.
    fn infer_extension_property(
        &mut self,
        expression: &'ast Expression,
        lhs_type: &Type,
        property: &Identifier,
    ) -> Option<Type> {
        for def in self.resolver.extension_defs_in_scope(property) {
            let function_type = self.declare_function_def(def);
            let Some(receiver) = function_type.receiver.clone() else {
                unreachable!("internal error: extension candidate without a `this` parameter");
            };

            if Unifier::is_receiver_match(&receiver, lhs_type) {
                return Some(self.record_extension(expression, def, function_type));
            }
            if let Some(type_params) = &def.type_params {
                let substitution: Substitution = type_params
                    .iter()
                    .map(|param| {
                        let instance = self.unifier.fresh_instance(param.binder);
                        (param.binder.location(), Type::GenericInstance(instance))
                    })
                    .collect();
                let receiver = receiver.apply_substitution(&substitution);
                if self.unifier.is_assignable_to(lhs_type, &receiver) {
                    return Some(self.record_extension(expression, def, function_type));
                }
            }
        }
        None
    }

    fn record_extension(
        &mut self,
        expression: &'ast Expression,
        def: &'ast FunctionDef,
        function_type: FunctionType,
    ) -> Type {
        self.extension_defs.insert(expression.location, def);
        Type::function(function_type)
    }
}
