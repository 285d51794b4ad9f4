//! Type parameter substitution.

use hades_ir::ast::Binder;
use hades_ir::{HasLocation, SourceLocation};
use rustc_hash::FxHashMap;

use crate::traverse::TypeFolder;
use crate::{Type, TypeParam};

/// Map from a type parameter's binder location to the type replacing it.
///
/// Partial: applying a substitution leaves parameters it does not
/// mention untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Substitution {
    map: FxHashMap<SourceLocation, Type>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair each parameter with the argument at the same position.
    ///
    /// Extra parameters or extra arguments are ignored.
    pub fn from_params(params: &[TypeParam], args: impl IntoIterator<Item = Type>) -> Self {
        params
            .iter()
            .zip(args)
            .map(|(param, arg)| (param.location(), arg))
            .collect()
    }

    pub fn insert(&mut self, param: SourceLocation, ty: Type) {
        self.map.insert(param, ty);
    }

    pub fn get(&self, param: SourceLocation) -> Option<&Type> {
        self.map.get(&param)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Rewrite `ty`, replacing every mapped `ParamRef`.
    pub fn apply(&self, ty: &Type) -> Type {
        if self.is_empty() || !ty.flags().has_param_ref() {
            return ty.clone();
        }
        SubstitutionFolder { substitution: self }.fold(ty)
    }
}

impl FromIterator<(SourceLocation, Type)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (SourceLocation, Type)>>(iter: I) -> Self {
        Substitution {
            map: iter.into_iter().collect(),
        }
    }
}

struct SubstitutionFolder<'a> {
    substitution: &'a Substitution,
}

impl TypeFolder for SubstitutionFolder<'_> {
    fn fold_param_ref(&mut self, binder: Binder) -> Type {
        self.substitution
            .get(binder.location())
            .cloned()
            .unwrap_or(Type::ParamRef(binder))
    }
}
