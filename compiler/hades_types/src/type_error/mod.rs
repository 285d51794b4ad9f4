//! Type errors reported by the checker.
//!
//! Errors are values: the checker records a [`TypeCheckError`] and carries
//! on with a best-effort type. Conversion to a [`Diagnostic`] happens at
//! the edge, where an interner is available to print names and types.

use hades_diagnostic::{Diagnostic, ErrorCode};
use hades_ir::ast::{Binder, BinaryOperator};
use hades_ir::{HasLocation, Name, SourceLocation, StringInterner};

use crate::Type;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeErrorKind {
    UnboundType(Name),
    UnboundVariable(Name),
    UnboundThis,
    /// A generic struct named without its type arguments.
    IncompleteType {
        missing_param_count: usize,
    },
    TypeNotAssignable {
        source: Type,
        destination: Type,
    },
    TypeNotCallable(Type),
    TypeNotEqualityComparable(Type),
    OperatorNotApplicable(BinaryOperator),
    NotAPointerType(Type),
    NotAnAddressableValue,
    NoSuchProperty {
        ty: Type,
        property: Name,
    },
    MissingArgs {
        required: usize,
    },
    TooManyArgs {
        required: usize,
    },
    UninferrableTypeParam(Binder),
    AmbiguousExpression,
    NotAConst,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeCheckError {
    pub location: SourceLocation,
    pub kind: TypeErrorKind,
}

impl TypeCheckError {
    pub fn new(location: SourceLocation, kind: TypeErrorKind) -> Self {
        TypeCheckError { location, kind }
    }

    pub fn code(&self) -> ErrorCode {
        match &self.kind {
            TypeErrorKind::TypeNotAssignable { .. } => ErrorCode::E2001,
            TypeErrorKind::UnboundType(_) => ErrorCode::E2002,
            TypeErrorKind::UnboundVariable(_) => ErrorCode::E2003,
            TypeErrorKind::UnboundThis => ErrorCode::E2004,
            TypeErrorKind::IncompleteType { .. } => ErrorCode::E2005,
            TypeErrorKind::TypeNotCallable(_) => ErrorCode::E2006,
            TypeErrorKind::TypeNotEqualityComparable(_) => ErrorCode::E2007,
            TypeErrorKind::OperatorNotApplicable(_) => ErrorCode::E2008,
            TypeErrorKind::NotAPointerType(_) => ErrorCode::E2009,
            TypeErrorKind::NotAnAddressableValue => ErrorCode::E2010,
            TypeErrorKind::NoSuchProperty { .. } => ErrorCode::E2011,
            TypeErrorKind::MissingArgs { .. } => ErrorCode::E2012,
            TypeErrorKind::TooManyArgs { .. } => ErrorCode::E2013,
            TypeErrorKind::UninferrableTypeParam(_) => ErrorCode::E2014,
            TypeErrorKind::AmbiguousExpression => ErrorCode::E2015,
            TypeErrorKind::NotAConst => ErrorCode::E2016,
        }
    }

    pub fn message(&self, interner: &StringInterner) -> String {
        match &self.kind {
            TypeErrorKind::UnboundType(name) => {
                format!("unbound type `{}`", interner.lookup(*name))
            }
            TypeErrorKind::UnboundVariable(name) => {
                format!("unbound variable `{}`", interner.lookup(*name))
            }
            TypeErrorKind::UnboundThis => "`this` is not bound here".to_string(),
            TypeErrorKind::IncompleteType {
                missing_param_count,
            } => format!("type is missing {missing_param_count} type argument(s)"),
            TypeErrorKind::TypeNotAssignable {
                source,
                destination,
            } => format!(
                "type `{}` is not assignable to `{}`",
                source.display(interner),
                destination.display(interner)
            ),
            TypeErrorKind::TypeNotCallable(ty) => {
                format!("type `{}` is not callable", ty.display(interner))
            }
            TypeErrorKind::TypeNotEqualityComparable(ty) => {
                format!("type `{}` cannot be compared for equality", ty.display(interner))
            }
            TypeErrorKind::OperatorNotApplicable(op) => {
                format!("operator `{op}` cannot be applied to these operands")
            }
            TypeErrorKind::NotAPointerType(ty) => {
                format!("type `{}` is not a pointer", ty.display(interner))
            }
            TypeErrorKind::NotAnAddressableValue => "value is not addressable".to_string(),
            TypeErrorKind::NoSuchProperty { ty, property } => format!(
                "type `{}` has no property `{}`",
                ty.display(interner),
                interner.lookup(*property)
            ),
            TypeErrorKind::MissingArgs { required } => {
                format!("missing arguments: expected {required}")
            }
            TypeErrorKind::TooManyArgs { required } => {
                format!("too many arguments: expected {required}")
            }
            TypeErrorKind::UninferrableTypeParam(binder) => format!(
                "cannot infer type argument `{}`",
                interner.lookup(binder.name())
            ),
            TypeErrorKind::AmbiguousExpression => {
                "type of expression cannot be inferred without context".to_string()
            }
            TypeErrorKind::NotAConst => "initializer is not a constant".to_string(),
        }
    }

    pub fn to_diagnostic(&self, interner: &StringInterner) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.code())
            .with_message(self.message(interner))
            .with_label(self.location, self.code().description());

        match &self.kind {
            TypeErrorKind::UninferrableTypeParam(binder) => {
                diagnostic.with_secondary_label(binder.location(), "type parameter declared here")
            }
            TypeErrorKind::NotAnAddressableValue => {
                diagnostic.with_note("only `val` bindings and their fields have an address")
            }
            TypeErrorKind::NotAConst => {
                diagnostic.with_note("constants must be of type CInt, Bool or Size")
            }
            _ => diagnostic,
        }
    }
}
