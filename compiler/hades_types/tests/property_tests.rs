//! Property-based tests for substitution and assignability.
//!
//! Types are generated over a small pool of type parameters so that
//! substitutions hit often.

#![allow(
    clippy::doc_markdown,
    clippy::disallowed_types,
    reason = "Proptest macros generate code with these patterns"
)]

use hades_ir::ast::{Binder, Identifier};
use hades_ir::{FileId, Name, QualifiedName, SourceLocation, Span};
use hades_types::{Constructor, FunctionType, Substitution, Type, TypeParam, Unifier};
use proptest::prelude::*;

const PARAM_POOL: u32 = 3;

fn param_binder(index: u32) -> Binder {
    Binder::new(Identifier {
        location: SourceLocation::new(FileId::new(0), Span::new(index, index + 1)),
        name: Name::from_raw(100 + index),
    })
}

fn box_constructor() -> Constructor {
    Constructor {
        binder: Some(param_binder(50)),
        name: QualifiedName::single(Name::from_raw(200)),
        params: Some(vec![TypeParam {
            binder: param_binder(51),
        }]),
    }
}

fn leaf_strategy() -> impl Strategy<Value = Type> {
    prop_oneof![
        Just(Type::Void),
        Just(Type::Bool),
        Just(Type::Byte),
        Just(Type::CInt),
        Just(Type::Size),
        (0..PARAM_POOL).prop_map(|index| Type::ParamRef(param_binder(index))),
    ]
}

fn type_strategy() -> impl Strategy<Value = Type> {
    leaf_strategy().prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), any::<bool>()).prop_map(|(to, is_mutable)| Type::RawPtr {
                to: Box::new(to),
                is_mutable,
            }),
            inner.clone().prop_map(|arg| Type::Application {
                callee: Box::new(Type::Constructor(box_constructor())),
                args: vec![arg],
            }),
            (proptest::collection::vec(inner.clone(), 0..3), inner).prop_map(|(from, to)| {
                Type::function(FunctionType::plain(from, to))
            }),
        ]
    })
}

fn closed_type_strategy() -> impl Strategy<Value = Type> {
    type_strategy().prop_filter("no type parameters", |ty| !ty.flags().has_param_ref())
}

proptest! {
    #[test]
    fn empty_substitution_is_identity(ty in type_strategy()) {
        prop_assert_eq!(ty.apply_substitution(&Substitution::new()), ty);
    }

    #[test]
    fn full_substitution_leaves_no_params(
        ty in type_strategy(),
        replacements in proptest::collection::vec(closed_type_strategy(), PARAM_POOL as usize),
    ) {
        let substitution: Substitution = replacements
            .into_iter()
            .enumerate()
            .map(|(index, replacement)| {
                let index = u32::try_from(index).unwrap_or_default();
                (SourceLocation::new(FileId::new(0), Span::new(index, index + 1)), replacement)
            })
            .collect();
        let substituted = ty.apply_substitution(&substitution);
        prop_assert!(!substituted.flags().has_param_ref());
    }

    #[test]
    fn assignability_is_reflexive(ty in type_strategy()) {
        let mut unifier = Unifier::new();
        prop_assert!(unifier.is_assignable_to(&ty, &ty));
    }

    #[test]
    fn instances_bind_to_the_first_type_they_meet(ty in closed_type_strategy()) {
        let mut unifier = Unifier::new();
        let instance = unifier.fresh_instance(param_binder(0));
        prop_assert!(unifier.is_assignable_to(&ty, &Type::GenericInstance(instance)));
        prop_assert_eq!(unifier.apply_instantiations(&Type::GenericInstance(instance)), ty);
    }
}
