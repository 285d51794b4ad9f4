//! The type model.
//!
//! `Type` is a plain owned tree. Equality is structural (`PartialEq`) with
//! one twist: type parameters and generic instances are identified by their
//! binder's location and id, so `T` in `fn a<T>` and `T` in `fn b<T>` are
//! different types even though they print the same.

mod display;

pub use display::TypeDisplay;

use hades_ir::ast::{Binder, TypeParamDecl};
use hades_ir::{HasLocation, Name, QualifiedName, SourceLocation, StringInterner};

use crate::flags::TypeFlags;
use crate::traverse::TypeVisitor;
use crate::Substitution;

/// A declared type parameter, referenced by its binder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeParam {
    pub binder: Binder,
}

impl TypeParam {
    pub fn location(&self) -> SourceLocation {
        self.binder.location()
    }
}

impl From<&TypeParamDecl> for TypeParam {
    fn from(decl: &TypeParamDecl) -> Self {
        TypeParam {
            binder: decl.binder,
        }
    }
}

/// Identity of a struct template.
///
/// Generic structs have `params`; a constructor produced by
/// monomorphization has neither a binder nor params.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Constructor {
    pub binder: Option<Binder>,
    pub name: QualifiedName,
    pub params: Option<Vec<TypeParam>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionType {
    /// Type of `this` for extension functions.
    pub receiver: Option<Type>,
    pub type_params: Option<Vec<TypeParam>>,
    pub from: Vec<Type>,
    pub to: Type,
}

impl FunctionType {
    /// A plain function value: no receiver, not generic.
    pub fn plain(from: Vec<Type>, to: Type) -> Self {
        FunctionType {
            receiver: None,
            type_params: None,
            from,
            to,
        }
    }
}

/// A fully resolved, non-generic struct instance.
///
/// Equality and hashing look at the constructor only: the member types
/// follow from it. A struct whose fields mention the struct itself (through
/// a pointer) sees an instance with no members while it is being declared.
#[derive(Clone, Debug)]
pub struct StructType {
    pub constructor: Constructor,
    /// Fields in declaration order.
    pub member_types: Vec<(Name, Type)>,
}

impl PartialEq for StructType {
    fn eq(&self, other: &Self) -> bool {
        self.constructor == other.constructor
    }
}

impl Eq for StructType {}

impl std::hash::Hash for StructType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.constructor.hash(state);
    }
}

impl StructType {
    pub fn member(&self, name: Name) -> Option<&Type> {
        self.member_types
            .iter()
            .find_map(|(field, ty)| (*field == name).then_some(ty))
    }
}

/// A unification variable standing for one type parameter at one call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GenericInstance {
    pub binder: Binder,
    pub id: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// Poison: produced after an error, compatible with everything.
    Error,
    Void,
    Bool,
    Byte,
    CInt,
    Size,
    RawPtr {
        to: Box<Type>,
        is_mutable: bool,
    },
    Function(Box<FunctionType>),
    Struct(Box<StructType>),
    Constructor(Constructor),
    /// A generic struct applied to arguments, `Box[CInt]`.
    Application {
        callee: Box<Type>,
        args: Vec<Type>,
    },
    /// Occurrence of a type parameter inside its generic definition.
    ParamRef(Binder),
    GenericInstance(GenericInstance),
}

impl Type {
    /// Immutable pointer to `to`.
    pub fn ptr(to: Type) -> Type {
        Type::RawPtr {
            to: Box::new(to),
            is_mutable: false,
        }
    }

    pub fn mut_ptr(to: Type) -> Type {
        Type::RawPtr {
            to: Box::new(to),
            is_mutable: true,
        }
    }

    pub fn function(f: FunctionType) -> Type {
        Type::Function(Box::new(f))
    }

    pub fn param_ref(param: &TypeParam) -> Type {
        Type::ParamRef(param.binder)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    /// Pointee type, if this is a pointer.
    pub fn pointee(&self) -> Option<&Type> {
        match self {
            Type::RawPtr { to, .. } => Some(to),
            _ => None,
        }
    }

    pub fn is_mutable_ptr(&self) -> bool {
        matches!(self, Type::RawPtr { is_mutable: true, .. })
    }

    /// Types `==` and `!=` are defined on.
    pub fn is_equality_comparable(&self) -> bool {
        matches!(
            self,
            Type::Bool | Type::CInt | Type::Byte | Type::RawPtr { .. } | Type::Size
        )
    }

    /// The function type behind a callee: the type itself or, one pointer
    /// indirection away, its pointee.
    pub fn as_callable(&self) -> Option<&FunctionType> {
        match self {
            Type::Function(f) => Some(f),
            Type::RawPtr { to, .. } => match to.as_ref() {
                Type::Function(f) => Some(f),
                _ => None,
            },
            _ => None,
        }
    }

    /// Replace type parameters mapped in `substitution`.
    ///
    /// Unmapped `ParamRef`s are left in place.
    #[must_use]
    pub fn apply_substitution(&self, substitution: &Substitution) -> Type {
        substitution.apply(self)
    }

    /// Summary of what this type contains.
    pub fn flags(&self) -> TypeFlags {
        let mut collector = FlagCollector(TypeFlags::empty());
        collector.visit(self);
        collector.0
    }

    /// Render this type for messages and mangled names.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> TypeDisplay<'a> {
        TypeDisplay::new(self, interner)
    }
}

struct FlagCollector(TypeFlags);

impl TypeVisitor for FlagCollector {
    fn visit_error(&mut self) {
        self.0 |= TypeFlags::HAS_ERROR;
    }

    fn visit_param_ref(&mut self, _binder: Binder) {
        self.0 |= TypeFlags::HAS_PARAM_REF;
    }

    fn visit_generic_instance(&mut self, _instance: GenericInstance) {
        self.0 |= TypeFlags::HAS_GENERIC_INSTANCE;
    }

    fn visit_application(&mut self, callee: &Type, args: &[Type]) {
        self.0 |= TypeFlags::HAS_APPLICATION;
        self.visit(callee);
        for arg in args {
            self.visit(arg);
        }
    }
}
