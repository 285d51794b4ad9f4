//! Traversals over HIR.
//!
//! - [`HirVisitor`] walks a module by reference. Every `visit_*` method
//!   defaults to its `super_visit_*` counterpart, which recurses into the
//!   children; override the former and call the latter to keep descending.
//! - [`HirTransformer`] rebuilds a module. Same shape, with types passing
//!   through [`HirTransformer::lower_type`] and its per-variant hooks.
//!
//! Both traversals reach every position that carries a [`Type`].

use hades_ir::ast::Binder;
use hades_ir::SourceLocation;
use hades_types::{FunctionType, Type, TypeFolder};

use crate::{
    HirBlock, HirConst, HirConstant, HirDefinition, HirExprKind, HirExpression,
    HirExternFunction, HirFunction, HirFunctionSignature, HirModule, HirParam, HirStatement,
    HirStatementKind, HirStruct, HirTypeParam, MatchIntArm,
};

// ── Visitor ─────────────────────────────────────────────────────────

pub trait HirVisitor {
    fn visit_module(&mut self, module: &HirModule) {
        self.super_visit_module(module);
    }

    fn visit_definition(&mut self, definition: &HirDefinition) {
        self.super_visit_definition(definition);
    }

    fn visit_signature(&mut self, signature: &HirFunctionSignature) {
        self.super_visit_signature(signature);
    }

    fn visit_block(&mut self, block: &HirBlock) {
        self.super_visit_block(block);
    }

    fn visit_statement(&mut self, statement: &HirStatement) {
        self.super_visit_statement(statement);
    }

    fn visit_expression(&mut self, expression: &HirExpression) {
        self.super_visit_expression(expression);
    }

    /// Called once per type-carrying position, with the location of the
    /// node that carries it.
    fn visit_type(&mut self, _ty: &Type, _location: SourceLocation) {}

    fn super_visit_module(&mut self, module: &HirModule) {
        for definition in module.definitions() {
            self.visit_definition(definition);
        }
    }

    fn super_visit_definition(&mut self, definition: &HirDefinition) {
        match definition {
            HirDefinition::Function(def) => {
                self.visit_signature(&def.signature);
                self.visit_block(&def.body);
            }
            HirDefinition::Struct(def) => {
                for (_, ty) in &def.fields {
                    self.visit_type(ty, def.location);
                }
            }
            HirDefinition::ExternFunction(def) => {
                for ty in &def.params {
                    self.visit_type(ty, def.location);
                }
                self.visit_type(&def.return_type, def.location);
            }
            HirDefinition::Const(def) => self.visit_expression(&def.initializer),
        }
    }

    fn super_visit_signature(&mut self, signature: &HirFunctionSignature) {
        if let Some(receiver) = &signature.receiver_type {
            self.visit_type(receiver, signature.location);
        }
        for param in &signature.params {
            self.visit_type(&param.ty, param.location);
        }
        self.visit_type(&signature.return_type, signature.location);
    }

    fn super_visit_block(&mut self, block: &HirBlock) {
        for statement in &block.statements {
            self.visit_statement(statement);
        }
    }

    fn super_visit_statement(&mut self, statement: &HirStatement) {
        let location = statement.location;
        match &statement.kind {
            HirStatementKind::Alloca { ty, .. } => self.visit_type(ty, location),
            HirStatementKind::Store { ptr, value } => {
                self.visit_expression(ptr);
                self.visit_expression(value);
            }
            HirStatementKind::Load { ptr, .. } => self.visit_expression(ptr),
            HirStatementKind::Move { value, .. } => self.visit_expression(value),
            HirStatementKind::Call {
                result_type,
                callee,
                args,
                type_args,
                ..
            } => {
                self.visit_type(result_type, location);
                self.visit_expression(callee);
                for arg in args {
                    self.visit_expression(arg);
                }
                for ty in type_args.iter().flatten() {
                    self.visit_type(ty, location);
                }
            }
            HirStatementKind::AllocateClosure {
                ty,
                function,
                ctx_ptr,
                ..
            } => {
                self.visit_type(ty, location);
                self.visit_expression(function);
                self.visit_expression(ctx_ptr);
            }
            HirStatementKind::InvokeClosure {
                result_type,
                closure,
                args,
                ..
            } => {
                self.visit_type(result_type, location);
                self.visit_expression(closure);
                for arg in args {
                    self.visit_expression(arg);
                }
            }
            HirStatementKind::GetStructField { ty, lhs, .. }
            | HirStatementKind::GetStructFieldPointer { ty, lhs, .. } => {
                self.visit_type(ty, location);
                self.visit_expression(lhs);
            }
            HirStatementKind::Memcpy {
                destination,
                source,
                bytes,
            } => {
                self.visit_expression(destination);
                self.visit_expression(source);
                self.visit_expression(bytes);
            }
            HirStatementKind::IntegerConvert { ty, value, .. } => {
                self.visit_type(ty, location);
                self.visit_expression(value);
            }
            HirStatementKind::PointerCast {
                to_pointer_of_type,
                value,
                ..
            } => {
                self.visit_type(to_pointer_of_type, location);
                self.visit_expression(value);
            }
            HirStatementKind::Not { expression, .. } => self.visit_expression(expression),
            HirStatementKind::BinOp { ty, lhs, rhs, .. } => {
                self.visit_type(ty, location);
                self.visit_expression(lhs);
                self.visit_expression(rhs);
            }
            HirStatementKind::TypeApplication {
                ty,
                expression,
                args,
                ..
            } => {
                self.visit_type(ty, location);
                self.visit_expression(expression);
                for arg in args {
                    self.visit_type(arg, location);
                }
            }
            HirStatementKind::Return(value) => self.visit_expression(value),
            HirStatementKind::Jump(_) => {}
            HirStatementKind::SwitchInt {
                condition,
                on_true,
                on_false,
            } => {
                self.visit_expression(condition);
                self.visit_block(on_true);
                self.visit_block(on_false);
            }
            HirStatementKind::MatchInt {
                value,
                arms,
                otherwise,
            } => {
                self.visit_expression(value);
                for arm in arms {
                    self.visit_block(&arm.block);
                }
                self.visit_block(otherwise);
            }
            HirStatementKind::While {
                condition_block,
                body,
                ..
            } => {
                self.visit_block(condition_block);
                self.visit_block(body);
            }
        }
    }

    fn super_visit_expression(&mut self, expression: &HirExpression) {
        self.visit_type(&expression.ty, expression.location);
        match &expression.kind {
            HirExprKind::TraitMethodRef { trait_args, .. } => {
                for arg in trait_args {
                    self.visit_type(arg, expression.location);
                }
            }
            HirExprKind::Constant(HirConstant::SizeOf(ty)) => {
                self.visit_type(ty, expression.location);
            }
            HirExprKind::GlobalRef(_)
            | HirExprKind::ParamRef(_)
            | HirExprKind::LocalRef(_)
            | HirExprKind::Constant(_) => {}
        }
    }
}

// ── Transformer ─────────────────────────────────────────────────────

pub trait HirTransformer {
    fn transform_module(&mut self, module: &HirModule) -> HirModule {
        self.super_transform_module(module)
    }

    /// One definition in, any number out: returning nothing drops it.
    fn transform_definition(&mut self, definition: &HirDefinition) -> Vec<HirDefinition> {
        self.super_transform_definition(definition)
    }

    fn transform_function_def(&mut self, def: &HirFunction) -> HirFunction {
        self.super_transform_function_def(def)
    }

    fn transform_struct_def(&mut self, def: &HirStruct) -> HirStruct {
        self.super_transform_struct_def(def)
    }

    fn transform_extern_def(&mut self, def: &HirExternFunction) -> HirExternFunction {
        self.super_transform_extern_def(def)
    }

    fn transform_const_def(&mut self, def: &HirConst) -> HirConst {
        self.super_transform_const_def(def)
    }

    fn transform_signature(&mut self, signature: &HirFunctionSignature) -> HirFunctionSignature {
        self.super_transform_signature(signature)
    }

    fn transform_type_param(&mut self, param: &HirTypeParam) -> HirTypeParam {
        *param
    }

    fn transform_param(&mut self, param: &HirParam) -> HirParam {
        HirParam {
            location: param.location,
            name: param.name,
            ty: self.lower_type(&param.ty),
        }
    }

    fn transform_block(&mut self, block: &HirBlock) -> HirBlock {
        self.super_transform_block(block)
    }

    /// One statement in, any number out.
    fn transform_statement(&mut self, statement: &HirStatement) -> Vec<HirStatement> {
        vec![self.super_transform_statement(statement)]
    }

    fn transform_expression(&mut self, expression: &HirExpression) -> HirExpression {
        self.super_transform_expression(expression)
    }

    // ── Types ───────────────────────────────────────────────────────

    fn lower_type(&mut self, ty: &Type) -> Type {
        TypeLowering { transformer: self }.fold(ty)
    }

    fn lower_param_ref_type(&mut self, binder: Binder) -> Type {
        Type::ParamRef(binder)
    }

    /// `callee` and `args` arrive already lowered.
    fn lower_type_application(&mut self, callee: Type, args: Vec<Type>) -> Type {
        Type::Application {
            callee: Box::new(callee),
            args,
        }
    }

    /// `function` arrives with its receiver, parameters and result lowered.
    fn lower_function_type(&mut self, function: FunctionType) -> Type {
        Type::function(function)
    }

    // ── Default rebuilds ────────────────────────────────────────────

    fn super_transform_module(&mut self, module: &HirModule) -> HirModule {
        module
            .definitions()
            .iter()
            .flat_map(|definition| self.transform_definition(definition))
            .collect()
    }

    fn super_transform_definition(&mut self, definition: &HirDefinition) -> Vec<HirDefinition> {
        let transformed = match definition {
            HirDefinition::Function(def) => HirDefinition::Function(self.transform_function_def(def)),
            HirDefinition::Struct(def) => HirDefinition::Struct(self.transform_struct_def(def)),
            HirDefinition::ExternFunction(def) => {
                HirDefinition::ExternFunction(self.transform_extern_def(def))
            }
            HirDefinition::Const(def) => HirDefinition::Const(self.transform_const_def(def)),
        };
        vec![transformed]
    }

    fn super_transform_function_def(&mut self, def: &HirFunction) -> HirFunction {
        HirFunction {
            location: def.location,
            signature: self.transform_signature(&def.signature),
            body: self.transform_block(&def.body),
        }
    }

    fn super_transform_struct_def(&mut self, def: &HirStruct) -> HirStruct {
        HirStruct {
            location: def.location,
            name: def.name.clone(),
            type_params: def
                .type_params
                .as_ref()
                .map(|params| params.iter().map(|p| self.transform_type_param(p)).collect()),
            fields: def
                .fields
                .iter()
                .map(|(name, ty)| (*name, self.lower_type(ty)))
                .collect(),
        }
    }

    fn super_transform_extern_def(&mut self, def: &HirExternFunction) -> HirExternFunction {
        HirExternFunction {
            location: def.location,
            name: def.name.clone(),
            params: def.params.iter().map(|ty| self.lower_type(ty)).collect(),
            return_type: self.lower_type(&def.return_type),
            extern_name: def.extern_name,
        }
    }

    fn super_transform_const_def(&mut self, def: &HirConst) -> HirConst {
        HirConst {
            location: def.location,
            name: def.name.clone(),
            initializer: self.transform_expression(&def.initializer),
        }
    }

    fn super_transform_signature(
        &mut self,
        signature: &HirFunctionSignature,
    ) -> HirFunctionSignature {
        HirFunctionSignature {
            location: signature.location,
            name: signature.name.clone(),
            type_params: signature
                .type_params
                .as_ref()
                .map(|params| params.iter().map(|p| self.transform_type_param(p)).collect()),
            receiver_type: signature.receiver_type.as_ref().map(|ty| self.lower_type(ty)),
            params: signature
                .params
                .iter()
                .map(|param| self.transform_param(param))
                .collect(),
            return_type: self.lower_type(&signature.return_type),
        }
    }

    fn super_transform_block(&mut self, block: &HirBlock) -> HirBlock {
        HirBlock {
            location: block.location,
            name: block.name,
            statements: block
                .statements
                .iter()
                .flat_map(|statement| self.transform_statement(statement))
                .collect(),
        }
    }

    fn super_transform_statement(&mut self, statement: &HirStatement) -> HirStatement {
        let kind = match &statement.kind {
            HirStatementKind::Alloca {
                name,
                is_mutable,
                ty,
            } => HirStatementKind::Alloca {
                name: *name,
                is_mutable: *is_mutable,
                ty: self.lower_type(ty),
            },
            HirStatementKind::Store { ptr, value } => HirStatementKind::Store {
                ptr: self.transform_expression(ptr),
                value: self.transform_expression(value),
            },
            HirStatementKind::Load { name, ptr } => HirStatementKind::Load {
                name: *name,
                ptr: self.transform_expression(ptr),
            },
            HirStatementKind::Move { name, value } => HirStatementKind::Move {
                name: *name,
                value: self.transform_expression(value),
            },
            HirStatementKind::Call {
                name,
                result_type,
                callee,
                args,
                type_args,
            } => HirStatementKind::Call {
                name: *name,
                result_type: self.lower_type(result_type),
                callee: self.transform_expression(callee),
                args: self.transform_expressions(args),
                type_args: type_args.as_ref().map(|tys| self.lower_types(tys)),
            },
            HirStatementKind::AllocateClosure {
                name,
                ty,
                function,
                ctx_ptr,
            } => HirStatementKind::AllocateClosure {
                name: *name,
                ty: self.lower_type(ty),
                function: self.transform_expression(function),
                ctx_ptr: self.transform_expression(ctx_ptr),
            },
            HirStatementKind::InvokeClosure {
                name,
                result_type,
                closure,
                args,
            } => HirStatementKind::InvokeClosure {
                name: *name,
                result_type: self.lower_type(result_type),
                closure: self.transform_expression(closure),
                args: self.transform_expressions(args),
            },
            HirStatementKind::GetStructField {
                name,
                ty,
                lhs,
                field,
                index,
            } => HirStatementKind::GetStructField {
                name: *name,
                ty: self.lower_type(ty),
                lhs: self.transform_expression(lhs),
                field: *field,
                index: *index,
            },
            HirStatementKind::GetStructFieldPointer {
                name,
                ty,
                lhs,
                field,
                index,
            } => HirStatementKind::GetStructFieldPointer {
                name: *name,
                ty: self.lower_type(ty),
                lhs: self.transform_expression(lhs),
                field: *field,
                index: *index,
            },
            HirStatementKind::Memcpy {
                destination,
                source,
                bytes,
            } => HirStatementKind::Memcpy {
                destination: self.transform_expression(destination),
                source: self.transform_expression(source),
                bytes: self.transform_expression(bytes),
            },
            HirStatementKind::IntegerConvert { name, ty, value } => {
                HirStatementKind::IntegerConvert {
                    name: *name,
                    ty: self.lower_type(ty),
                    value: self.transform_expression(value),
                }
            }
            HirStatementKind::PointerCast {
                name,
                to_pointer_of_type,
                value,
            } => HirStatementKind::PointerCast {
                name: *name,
                to_pointer_of_type: self.lower_type(to_pointer_of_type),
                value: self.transform_expression(value),
            },
            HirStatementKind::Not { name, expression } => HirStatementKind::Not {
                name: *name,
                expression: self.transform_expression(expression),
            },
            HirStatementKind::BinOp {
                name,
                ty,
                lhs,
                operator,
                rhs,
            } => HirStatementKind::BinOp {
                name: *name,
                ty: self.lower_type(ty),
                lhs: self.transform_expression(lhs),
                operator: *operator,
                rhs: self.transform_expression(rhs),
            },
            HirStatementKind::TypeApplication {
                name,
                ty,
                expression,
                args,
            } => HirStatementKind::TypeApplication {
                name: *name,
                ty: self.lower_type(ty),
                expression: self.transform_expression(expression),
                args: self.lower_types(args),
            },
            HirStatementKind::Return(value) => {
                HirStatementKind::Return(self.transform_expression(value))
            }
            HirStatementKind::Jump(target) => HirStatementKind::Jump(*target),
            HirStatementKind::SwitchInt {
                condition,
                on_true,
                on_false,
            } => HirStatementKind::SwitchInt {
                condition: self.transform_expression(condition),
                on_true: self.transform_block(on_true),
                on_false: self.transform_block(on_false),
            },
            HirStatementKind::MatchInt {
                value,
                arms,
                otherwise,
            } => HirStatementKind::MatchInt {
                value: self.transform_expression(value),
                arms: arms
                    .iter()
                    .map(|arm| MatchIntArm {
                        value: arm.value,
                        block: self.transform_block(&arm.block),
                    })
                    .collect(),
                otherwise: self.transform_block(otherwise),
            },
            HirStatementKind::While {
                condition_name,
                condition_block,
                body,
            } => HirStatementKind::While {
                condition_name: *condition_name,
                condition_block: self.transform_block(condition_block),
                body: self.transform_block(body),
            },
        };
        HirStatement {
            location: statement.location,
            kind,
        }
    }

    fn super_transform_expression(&mut self, expression: &HirExpression) -> HirExpression {
        let kind = match &expression.kind {
            HirExprKind::TraitMethodRef {
                trait_name,
                trait_args,
                method,
            } => HirExprKind::TraitMethodRef {
                trait_name: trait_name.clone(),
                trait_args: self.lower_types(trait_args),
                method: *method,
            },
            HirExprKind::Constant(HirConstant::SizeOf(ty)) => {
                HirExprKind::Constant(HirConstant::SizeOf(self.lower_type(ty)))
            }
            other => other.clone(),
        };
        HirExpression {
            location: expression.location,
            ty: self.lower_type(&expression.ty),
            kind,
        }
    }

    fn transform_expressions(&mut self, expressions: &[HirExpression]) -> Vec<HirExpression> {
        expressions
            .iter()
            .map(|expression| self.transform_expression(expression))
            .collect()
    }

    fn lower_types(&mut self, types: &[Type]) -> Vec<Type> {
        types.iter().map(|ty| self.lower_type(ty)).collect()
    }
}

/// Routes a [`TypeFolder`] pass through a transformer's lowering hooks.
struct TypeLowering<'t, T: ?Sized> {
    transformer: &'t mut T,
}

impl<T: HirTransformer + ?Sized> TypeFolder for TypeLowering<'_, T> {
    fn fold_function(&mut self, func: &FunctionType) -> Type {
        let lowered = FunctionType {
            receiver: func.receiver.as_ref().map(|r| self.fold(r)),
            type_params: func.type_params.clone(),
            from: func.from.iter().map(|t| self.fold(t)).collect(),
            to: self.fold(&func.to),
        };
        self.transformer.lower_function_type(lowered)
    }

    fn fold_application(&mut self, callee: &Type, args: &[Type]) -> Type {
        let callee = self.fold(callee);
        let args = args.iter().map(|t| self.fold(t)).collect();
        self.transformer.lower_type_application(callee, args)
    }

    fn fold_param_ref(&mut self, binder: Binder) -> Type {
        self.transformer.lower_param_ref_type(binder)
    }
}
