//! Hand-built types for unit tests.

use hades_ir::ast::{Binder, Identifier};
use hades_ir::{FileId, Name, QualifiedName, SourceLocation, Span};

use crate::{Constructor, StructType, Type, TypeParam};

/// Binder named by raw name `name`, located at `offset` in file 0.
pub(crate) fn binder(name: u32, offset: u32) -> Binder {
    Binder::new(Identifier {
        location: SourceLocation::new(FileId::new(0), Span::new(offset, offset + 1)),
        name: Name::from_raw(name),
    })
}

pub(crate) fn constructor(name: u32, offset: u32, params: Option<Vec<Binder>>) -> Constructor {
    Constructor {
        binder: Some(binder(name, offset)),
        name: QualifiedName::single(Name::from_raw(name)),
        params: params.map(|ps| ps.into_iter().map(|binder| TypeParam { binder }).collect()),
    }
}

pub(crate) fn struct_type(constructor: Constructor, member_types: Vec<(Name, Type)>) -> Type {
    Type::Struct(Box::new(StructType {
        constructor,
        member_types,
    }))
}
