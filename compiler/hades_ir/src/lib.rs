//! Hades IR - source-level representation
//!
//! This crate contains the data structures every later pass builds on:
//! - Source locations (`Span`, `FileId`, `SourceLocation`)
//! - Interned identifiers (`Name`, `StringInterner`, `QualifiedName`)
//! - The AST produced by the parser
//! - The `Resolver` interface the type checker consumes
//!
//! # Identity
//!
//! AST nodes are identified by location, never by structure. Every map keyed
//! by a node in the later passes is keyed by its `SourceLocation`.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod interner;
mod name;
pub mod resolve;
mod span;

pub use interner::StringInterner;
pub use name::{Name, QualifiedName, QualifiedNameDisplay};
pub use resolve::{Resolver, TypeBinding, ValueBinding};
pub use span::{FileId, HasLocation, SourceLocation, Span};

static_assert_size!(Span, 8);
static_assert_size!(Name, 4);
static_assert_size!(SourceLocation, 12);
