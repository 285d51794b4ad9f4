//! The specialization worklist.
//!
//! # Algorithm
//!
//! 1. Transform the module. Generic definitions are dropped; every call with
//!    type arguments, every `TypeApplication` and every applied struct type
//!    is rewritten to the specialized name and, on first sight, enqueued.
//! 2. Drain the queue first-in first-out. Specializing a definition lowers
//!    it under the substitution for its request, which can enqueue more.
//!
//! A request is enqueued once per specialized name, so the drain stops
//! when the program's instantiations are finite. [`MonoConfig`] bounds the
//! rest.

use std::collections::VecDeque;

use hades_hir::{
    HirDefinition, HirExprKind, HirExpression, HirFunction, HirFunctionSignature, HirModule,
    HirStatement, HirStatementKind, HirStruct, HirTransformer, HirTypeParam,
};
use hades_ir::ast::Binder;
use hades_ir::{HasLocation, QualifiedName, SourceLocation, StringInterner};
use hades_types::{Constructor, FunctionType, Substitution, Type};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::mangle::specialized_name;
use crate::MonoError;

/// A generic definition to instantiate at concrete type arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpecializationRequest {
    /// Name of the generic definition in the input module.
    pub name: QualifiedName,
    /// Already lowered: no type parameters or applications remain.
    pub type_args: Vec<Type>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonoConfig {
    /// Most distinct specializations one run may create.
    pub max_specializations: usize,
}

impl MonoConfig {
    pub const DEFAULT_MAX_SPECIALIZATIONS: usize = 10_000;
}

impl Default for MonoConfig {
    fn default() -> Self {
        MonoConfig {
            max_specializations: Self::DEFAULT_MAX_SPECIALIZATIONS,
        }
    }
}

pub struct Monomorphizer<'a> {
    old: &'a HirModule,
    interner: &'a StringInterner,
    config: MonoConfig,
    queue: VecDeque<SpecializationRequest>,
    queued: FxHashSet<QualifiedName>,
    /// Substitution of the specialization being generated. Swapped, not
    /// stacked: nested specializations restore the caller's afterwards.
    current: Option<Substitution>,
    error: Option<MonoError>,
}

impl<'a> Monomorphizer<'a> {
    pub fn new(old: &'a HirModule, interner: &'a StringInterner, config: MonoConfig) -> Self {
        Monomorphizer {
            old,
            interner,
            config,
            queue: VecDeque::new(),
            queued: FxHashSet::default(),
            current: None,
            error: None,
        }
    }

    /// Produce the monomorphized module.
    ///
    /// # Errors
    /// [`MonoError::SpecializationLimit`] when the program needs more
    /// specializations than [`MonoConfig::max_specializations`].
    ///
    /// # Panics
    /// On malformed input: a generic definition referenced under a name
    /// shared by several definitions, a type argument count that differs
    /// from the parameter count, or a type parameter outside its definition.
    #[tracing::instrument(level = "debug", skip_all, fields(definitions = self.old.len()))]
    pub fn run(mut self) -> Result<HirModule, MonoError> {
        let old = self.old;
        let mut module = self.transform_module(old);
        while let Some(request) = self.queue.pop_front() {
            if let Some(error) = self.error.take() {
                return Err(error);
            }
            let definition = self.add_specialization(&request);
            module.add_definition(definition);
        }
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        debug!(
            specializations = self.queued.len(),
            definitions = module.len(),
            "monomorphization finished"
        );
        trace!("HIR after monomorphization:\n{}", module.display(self.interner));
        Ok(module)
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(name = %request.name.display(self.interner), args = request.type_args.len())
    )]
    fn add_specialization(&mut self, request: &SpecializationRequest) -> HirDefinition {
        let old = self.old;
        let definitions = old.find_definitions(&request.name);
        let [definition] = definitions.as_slice() else {
            panic!(
                "internal error: expected one definition of `{}` to specialize, found {}",
                request.name.display(self.interner),
                definitions.len()
            );
        };

        let substitution = self.make_substitution(definition.type_params(), &request.type_args);
        let caller = self.current.replace(substitution);
        let name = specialized_name(&request.name, &request.type_args, self.interner);

        let specialized = match definition {
            HirDefinition::Function(def) => HirDefinition::Function(HirFunction {
                location: def.location,
                signature: self.specialize_signature(&def.signature, name),
                body: self.transform_block(&def.body),
            }),
            HirDefinition::Struct(def) => HirDefinition::Struct(HirStruct {
                location: def.location,
                name,
                type_params: None,
                fields: def
                    .fields
                    .iter()
                    .map(|(field, ty)| (*field, self.lower_type(ty)))
                    .collect(),
            }),
            HirDefinition::ExternFunction(_) | HirDefinition::Const(_) => {
                unreachable!("internal error: only functions and structs are generic")
            }
        };

        self.current = caller;
        specialized
    }

    fn specialize_signature(
        &mut self,
        signature: &HirFunctionSignature,
        name: QualifiedName,
    ) -> HirFunctionSignature {
        HirFunctionSignature {
            location: signature.location,
            name,
            type_params: None,
            receiver_type: signature.receiver_type.as_ref().map(|ty| self.lower_type(ty)),
            params: signature
                .params
                .iter()
                .map(|param| self.transform_param(param))
                .collect(),
            return_type: self.lower_type(&signature.return_type),
        }
    }

    /// Map each type parameter's binder location to the lowered argument at
    /// the same position.
    fn make_substitution(
        &mut self,
        params: Option<&[HirTypeParam]>,
        type_args: &[Type],
    ) -> Substitution {
        let Some(params) = params else {
            panic!("internal error: type arguments applied to a non-generic definition");
        };
        assert_eq!(
            params.len(),
            type_args.len(),
            "internal error: type argument count differs from type parameter count"
        );
        params
            .iter()
            .zip(type_args)
            .map(|(param, arg)| (param.location, self.lower_type(arg)))
            .collect()
    }

    /// Rewrite a reference to a generic global into a reference to its
    /// specialization at `type_args`, enqueuing the specialization.
    fn generate_specialization(
        &mut self,
        expression: &HirExpression,
        type_args: &[Type],
    ) -> HirExpression {
        let HirExprKind::GlobalRef(name) = &expression.kind else {
            panic!("internal error: type arguments applied to a non-global expression");
        };
        let old = self.old;
        let definition = match old.find_global_definition(name) {
            Some(definition @ (HirDefinition::Function(_) | HirDefinition::Struct(_))) => definition,
            _ => panic!(
                "internal error: `{}` is not a generic function or struct",
                name.display(self.interner)
            ),
        };

        let type_args = self.lower_types(type_args);
        let substitution = self.make_substitution(definition.type_params(), &type_args);
        let ty = self.lower_type(&expression.ty.apply_substitution(&substitution));
        let specialized = self.specialized_name(name, type_args);
        HirExpression::global_ref(expression.location, ty, specialized)
    }

    /// The specialized name of `name` at `type_args`, enqueuing the request
    /// the first time the name is seen.
    fn specialized_name(&mut self, name: &QualifiedName, type_args: Vec<Type>) -> QualifiedName {
        let specialized = specialized_name(name, &type_args, self.interner);
        if self.queued.contains(&specialized) {
            return specialized;
        }
        if self.queued.len() >= self.config.max_specializations {
            if self.error.is_none() {
                self.error = Some(MonoError::SpecializationLimit {
                    limit: self.config.max_specializations,
                    name: specialized.display(self.interner).to_string(),
                    location: self.definition_location(name),
                });
            }
            return specialized;
        }

        debug!(name = %specialized.display(self.interner), "queued specialization");
        self.queued.insert(specialized.clone());
        self.queue.push_back(SpecializationRequest {
            name: name.clone(),
            type_args,
        });
        specialized
    }

    fn definition_location(&self, name: &QualifiedName) -> SourceLocation {
        self.old
            .find_global_definition(name)
            .map_or(SourceLocation::GENERATED, HirDefinition::location)
    }
}

impl HirTransformer for Monomorphizer<'_> {
    fn transform_definition(&mut self, definition: &HirDefinition) -> Vec<HirDefinition> {
        if definition.is_generic() {
            return Vec::new();
        }
        self.super_transform_definition(definition)
    }

    fn transform_type_param(&mut self, _param: &HirTypeParam) -> HirTypeParam {
        unreachable!("internal error: type parameter outside a generic definition")
    }

    fn transform_statement(&mut self, statement: &HirStatement) -> Vec<HirStatement> {
        let kind = match &statement.kind {
            HirStatementKind::Call {
                name,
                result_type,
                callee,
                args,
                type_args: Some(type_args),
            } => HirStatementKind::Call {
                name: *name,
                result_type: self.lower_type(result_type),
                callee: self.generate_specialization(callee, type_args),
                args: self.transform_expressions(args),
                type_args: None,
            },
            HirStatementKind::TypeApplication {
                name,
                expression,
                args,
                ..
            } => HirStatementKind::Move {
                name: *name,
                value: self.generate_specialization(expression, args),
            },
            _ => return vec![self.super_transform_statement(statement)],
        };
        vec![HirStatement {
            location: statement.location,
            kind,
        }]
    }

    fn lower_param_ref_type(&mut self, binder: Binder) -> Type {
        let Some(substitution) = &self.current else {
            panic!(
                "internal error: type parameter `{}` outside a specialization",
                self.interner.lookup(binder.name())
            );
        };
        match substitution.get(binder.location()) {
            Some(ty) => ty.clone(),
            None => panic!(
                "internal error: type parameter `{}` is not bound by the active specialization",
                self.interner.lookup(binder.name())
            ),
        }
    }

    fn lower_type_application(&mut self, callee: Type, args: Vec<Type>) -> Type {
        let Type::Constructor(constructor) = callee else {
            panic!("internal error: applied type is not a struct constructor");
        };
        let old = self.old;
        if !matches!(
            old.find_global_definition(&constructor.name),
            Some(HirDefinition::Struct(_))
        ) {
            panic!(
                "internal error: `{}` is applied but is not a struct",
                constructor.name.display(self.interner)
            );
        }
        let name = self.specialized_name(&constructor.name, args);
        Type::Constructor(Constructor {
            binder: None,
            name,
            params: None,
        })
    }

    fn lower_function_type(&mut self, function: FunctionType) -> Type {
        Type::function(FunctionType {
            type_params: None,
            ..function
        })
    }
}
