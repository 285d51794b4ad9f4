//! A small AST-to-HIR lowering for the scenario programs.
//!
//! Handles functions and structs; `val`, `return` and expression
//! statements; calls, variables, field reads and literals. Anything else
//! panics.

use hades_hir::{
    HirBuilder, HirDefinition, HirExpression, HirFunction, HirFunctionSignature, HirModule,
    HirParam, HirStatementKind, HirStruct, HirTypeParam,
};
use hades_ir::ast::{
    Block, DeclarationKind, ExprKind, Expression, FunctionDef, Program, StatementKind, StructDef,
    TypeParamDecl,
};
use hades_ir::{HasLocation, Name, QualifiedName, StringInterner};
use hades_types::{Type, TypedProgram};

pub fn lower(program: &Program, typed: &TypedProgram<'_>, interner: &StringInterner) -> HirModule {
    let mut structs = Vec::new();
    for file in &program.files {
        for declaration in &file.declarations {
            if let DeclarationKind::Struct(def) = &declaration.kind {
                let fields = def.members.iter().map(|member| member.binder.name()).collect();
                structs.push((file.module.append(def.binder.name()), fields));
            }
        }
    }

    let mut module = HirModule::new();
    for file in &program.files {
        let lowering = Lowering {
            typed,
            interner,
            module: &file.module,
            structs: &structs,
        };
        for declaration in &file.declarations {
            let definition = match &declaration.kind {
                DeclarationKind::Function(def) => lowering.function(def),
                DeclarationKind::Struct(def) => lowering.structure(def),
                other => panic!("scenario lowering does not handle {other:?}"),
            };
            module.add_definition(definition);
        }
    }
    module
}

struct Lowering<'a, 'ast> {
    typed: &'a TypedProgram<'ast>,
    interner: &'a StringInterner,
    module: &'a QualifiedName,
    /// Field names of every struct in the program.
    structs: &'a [(QualifiedName, Vec<Name>)],
}

struct Scope {
    params: Vec<Name>,
    locals: Vec<Name>,
}

fn type_params(params: Option<&[TypeParamDecl]>) -> Option<Vec<HirTypeParam>> {
    params.map(|params| {
        params
            .iter()
            .map(|param| HirTypeParam {
                location: param.binder.location(),
                name: param.binder.name(),
            })
            .collect()
    })
}

impl Lowering<'_, '_> {
    fn structure(&self, def: &StructDef) -> HirDefinition {
        HirDefinition::Struct(HirStruct {
            location: def.location,
            name: self.module.append(def.binder.name()),
            type_params: type_params(def.type_params.as_deref()),
            fields: def
                .members
                .iter()
                .map(|member| {
                    let ty = self.typed.annotation_type(&member.annotation).unwrap();
                    (member.binder.name(), ty.clone())
                })
                .collect(),
        })
    }

    fn function(&self, def: &FunctionDef) -> HirDefinition {
        assert!(!def.is_extension(), "scenario lowering does not handle extensions");
        let params: Vec<HirParam> = def
            .params
            .iter()
            .map(|param| HirParam {
                location: param.location,
                name: param.binder.name(),
                ty: self.typed.binder_type(&param.binder).unwrap().clone(),
            })
            .collect();
        let mut scope = Scope {
            params: params.iter().map(|param| param.name).collect(),
            locals: Vec::new(),
        };

        let mut builder = HirBuilder::new(self.interner, def.body.location);
        let body = builder.build_block(|b| self.block(b, &def.body, &mut scope));

        HirDefinition::Function(HirFunction {
            location: def.location,
            signature: HirFunctionSignature {
                location: def.location,
                name: self.module.append(def.name.name()),
                type_params: type_params(def.type_params.as_deref()),
                receiver_type: None,
                params,
                return_type: self.typed.annotation_type(&def.return_type).unwrap().clone(),
            },
            body,
        })
    }

    fn block(&self, b: &mut HirBuilder<'_>, block: &Block, scope: &mut Scope) {
        for statement in &block.members {
            match &statement.kind {
                StatementKind::Val(val) => {
                    let value = self.expression(b, &val.rhs, scope);
                    b.location = statement.location;
                    b.emit(HirStatementKind::Move {
                        name: val.binder.name(),
                        value,
                    });
                    scope.locals.push(val.binder.name());
                }
                StatementKind::Return(value) => {
                    let value = self.expression(b, value, scope);
                    b.location = statement.location;
                    b.emit_return(value);
                }
                StatementKind::Expression(value) => {
                    self.expression(b, value, scope);
                }
                other => panic!("scenario lowering does not handle {other:?}"),
            }
        }
    }

    fn expression(
        &self,
        b: &mut HirBuilder<'_>,
        expression: &Expression,
        scope: &Scope,
    ) -> HirExpression {
        let ty = self.typed.expression_type(expression).unwrap().clone();
        match &expression.kind {
            ExprKind::IntLiteral(value) => {
                b.location = expression.location;
                b.int_value(*value)
            }
            ExprKind::BoolLiteral(value) => {
                b.location = expression.location;
                if *value {
                    b.true_value()
                } else {
                    b.false_value()
                }
            }
            ExprKind::Var(name) => {
                let location = expression.location;
                if scope.locals.contains(&name.name) {
                    HirExpression::local_ref(location, ty, name.name)
                } else if scope.params.contains(&name.name) {
                    HirExpression::param_ref(location, ty, name.name)
                } else {
                    HirExpression::global_ref(location, ty, self.module.append(name.name))
                }
            }
            ExprKind::Call { callee, args } => {
                let callee_value = self.expression(b, callee, scope);
                let args = args
                    .iter()
                    .map(|arg| self.expression(b, arg, scope))
                    .collect();
                let type_args = self.typed.type_args(expression).map(<[Type]>::to_vec);
                b.location = expression.location;
                b.emit_call(ty, callee_value, args, type_args)
            }
            ExprKind::Property { lhs, property } => {
                let lhs = self.expression(b, lhs, scope);
                let index = self.field_index(&lhs.ty, property.name);
                b.location = expression.location;
                b.get_struct_field(lhs, property.name, index, ty)
            }
            other => panic!("scenario lowering does not handle {other:?}"),
        }
    }

    fn field_index(&self, ty: &Type, field: Name) -> usize {
        let name = match ty {
            Type::Struct(struct_type) => &struct_type.constructor.name,
            Type::Application { callee, .. } => match callee.as_ref() {
                Type::Constructor(constructor) => &constructor.name,
                other => panic!("field read through {other:?}"),
            },
            other => panic!("field read through {other:?}"),
        };
        let (_, fields) = self
            .structs
            .iter()
            .find(|(struct_name, _)| struct_name == name)
            .unwrap();
        fields.iter().position(|&f| f == field).unwrap()
    }
}
