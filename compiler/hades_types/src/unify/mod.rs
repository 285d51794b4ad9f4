//! Assignability and the unification store.
//!
//! There is no separate unification algorithm: checking that a source type
//! is assignable to a destination type binds any unresolved
//! [`GenericInstance`] on either side to the type on the other side. The
//! first binding wins; later checks against the same instance compare
//! against what it was bound to.

use hades_ir::ast::Binder;
use hades_ir::HasLocation;
use rustc_hash::FxHashMap;

use crate::traverse::TypeFolder;
use crate::{FunctionType, GenericInstance, Type};

/// Allocates inference variables and records what they resolve to.
#[derive(Debug, Default)]
pub struct Unifier {
    instantiations: FxHashMap<u64, Type>,
    next_id: u64,
}

impl Unifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh, unresolved instance for the parameter `binder`.
    pub fn fresh_instance(&mut self, binder: Binder) -> GenericInstance {
        let id = self.next_id;
        self.next_id += 1;
        GenericInstance { binder, id }
    }

    /// What `instance` has been bound to, if anything.
    pub fn resolution(&self, instance: GenericInstance) -> Option<&Type> {
        self.instantiations.get(&instance.id)
    }

    /// Bind `instance` unless it is already bound. Returns whether the
    /// binding was recorded.
    pub fn bind_if_unresolved(&mut self, instance: GenericInstance, ty: Type) -> bool {
        if self.instantiations.contains_key(&instance.id) {
            return false;
        }
        self.instantiations.insert(instance.id, ty);
        true
    }

    /// Replace every resolved instance in `ty` with its resolution.
    /// Unresolved instances are left in place.
    pub fn apply_instantiations(&self, ty: &Type) -> Type {
        if !ty.flags().has_generic_instance() {
            return ty.clone();
        }
        InstantiationFolder { unifier: self }.fold(ty)
    }

    /// Structural identity.
    pub fn is_type_equal(a: &Type, b: &Type) -> bool {
        a == b
    }

    /// Whether an extension declared on `receiver` applies to `lhs` without
    /// inference: equal types, or a mutable pointer where `receiver` is
    /// immutable, at any depth.
    pub fn is_receiver_match(receiver: &Type, lhs: &Type) -> bool {
        match (receiver, lhs) {
            (
                Type::RawPtr {
                    to: receiver_to,
                    is_mutable: false,
                },
                Type::RawPtr { to: lhs_to, .. },
            ) => Self::is_receiver_match(receiver_to, lhs_to),
            _ => Self::is_type_equal(receiver, lhs),
        }
    }

    /// Whether a value of type `source` may be used where `destination` is
    /// expected. Binds unresolved instances on either side.
    ///
    /// # Panics
    /// Comparing function types that carry a receiver or type parameters is
    /// an internal error: only plain function values are ever compared.
    pub fn is_assignable_to(&mut self, source: &Type, destination: &Type) -> bool {
        match (source, destination) {
            (Type::Error, _) | (_, Type::Error) => true,
            (Type::Size, Type::Size)
            | (Type::CInt, Type::CInt)
            | (Type::Bool, Type::Bool)
            | (Type::Byte, Type::Byte)
            | (Type::Void, Type::Void) => true,
            (Type::ParamRef(s), Type::ParamRef(d)) if s.location() == d.location() => true,
            // Never bind an instance to itself.
            (Type::GenericInstance(s), Type::GenericInstance(d)) if s.id == d.id => true,
            (
                Type::RawPtr {
                    to: source_to,
                    is_mutable: source_mut,
                },
                Type::RawPtr {
                    to: destination_to,
                    is_mutable: destination_mut,
                },
            ) => (*source_mut || !*destination_mut) && self.is_assignable_to(source_to, destination_to),
            (Type::Struct(s), Type::Struct(d)) if s.constructor == d.constructor => true,
            (Type::Constructor(s), Type::Constructor(d)) if s.name == d.name => true,
            (
                Type::Application {
                    callee: source_callee,
                    args: source_args,
                },
                Type::Application {
                    callee: destination_callee,
                    args: destination_args,
                },
            ) => {
                self.is_assignable_to(source_callee, destination_callee)
                    && source_args.len() == destination_args.len()
                    && source_args
                        .iter()
                        .zip(destination_args)
                        .all(|(s, d)| self.is_assignable_to(s, d))
            }
            (_, Type::GenericInstance(instance)) => match self.instantiations.get(&instance.id) {
                Some(resolved) => {
                    let resolved = resolved.clone();
                    self.is_assignable_to(source, &resolved)
                }
                None => {
                    self.instantiations.insert(instance.id, source.clone());
                    true
                }
            },
            (Type::GenericInstance(instance), _) => match self.instantiations.get(&instance.id) {
                Some(resolved) => {
                    let resolved = resolved.clone();
                    self.is_assignable_to(&resolved, destination)
                }
                None => {
                    self.instantiations.insert(instance.id, destination.clone());
                    true
                }
            },
            (Type::Function(s), Type::Function(d)) => self.is_function_assignable(s, d),
            _ => false,
        }
    }

    fn is_function_assignable(&mut self, source: &FunctionType, destination: &FunctionType) -> bool {
        assert!(
            source.receiver.is_none() && destination.receiver.is_none(),
            "internal error: compared function types with receivers"
        );
        assert!(
            source.type_params.is_none() && destination.type_params.is_none(),
            "internal error: compared generic function types"
        );
        // Parameters are contravariant, so the roles swap.
        source.from.len() == destination.from.len()
            && source
                .from
                .iter()
                .zip(&destination.from)
                .all(|(s, d)| self.is_assignable_to(d, s))
            && self.is_assignable_to(&source.to, &destination.to)
    }
}

struct InstantiationFolder<'a> {
    unifier: &'a Unifier,
}

impl TypeFolder for InstantiationFolder<'_> {
    fn fold_generic_instance(&mut self, instance: GenericInstance) -> Type {
        match self.unifier.resolution(instance) {
            Some(resolved) => self.fold(resolved),
            None => Type::GenericInstance(instance),
        }
    }
}
