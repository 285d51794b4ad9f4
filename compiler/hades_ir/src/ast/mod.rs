//! Abstract syntax tree.
//!
//! The tree produced by the parser and consumed by name resolution and the
//! type checker. Nodes own their children (`Box`/`Vec`); every node carries a
//! [`SourceLocation`] that serves as its identity for memoization.
//!
//! # Node families
//!
//! - [`Declaration`]: top-level items of a [`SourceFile`]
//! - [`Statement`]: members of a [`Block`]
//! - [`Expression`]: values
//! - [`TypeAnnotation`]: written types

pub mod builder;
mod operators;

pub use operators::BinaryOperator;

use crate::{HasLocation, Name, QualifiedName, SourceLocation};
use crate::FileId;

// ── Identifiers ─────────────────────────────────────────────────────

/// A name occurrence at a location.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub location: SourceLocation,
    pub name: Name,
}

/// A name-introduction site: function name, parameter, struct field, local.
///
/// Identity is the location, not the text. Two binders spelled the same way
/// in different places are different entities.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Binder {
    pub identifier: Identifier,
}

impl Binder {
    pub fn new(identifier: Identifier) -> Self {
        Binder { identifier }
    }

    #[inline]
    pub fn name(&self) -> Name {
        self.identifier.name
    }
}

impl HasLocation for Identifier {
    fn location(&self) -> SourceLocation {
        self.location
    }
}

impl HasLocation for Binder {
    fn location(&self) -> SourceLocation {
        self.identifier.location
    }
}

/// A dotted path written in source, e.g. `mem.Box` in a type position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QualifiedPath {
    pub location: SourceLocation,
    pub identifiers: Vec<Identifier>,
}

// ── Program structure ──────────────────────────────────────────────

/// One parsed file together with the module path it declares.
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub file: FileId,
    pub module: QualifiedName,
    pub declarations: Vec<Declaration>,
}

/// Every source file of a compilation.
#[derive(Clone, Debug, Default)]
pub struct Program {
    pub files: Vec<SourceFile>,
}

// ── Declarations ───────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Declaration {
    pub location: SourceLocation,
    pub kind: DeclarationKind,
}

#[derive(Clone, Debug)]
pub enum DeclarationKind {
    Function(FunctionDef),
    ExternFunction(ExternFunctionDef),
    Struct(StructDef),
    Const(ConstDef),
    ImportAs {
        module_path: QualifiedPath,
        as_name: Binder,
    },
    Error,
}

impl HasLocation for Declaration {
    fn location(&self) -> SourceLocation {
        self.location
    }
}

/// A type parameter declaration, `T` in `fn id<T>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamDecl {
    pub binder: Binder,
}

#[derive(Clone, Debug)]
pub struct Param {
    pub location: SourceLocation,
    pub binder: Binder,
    pub annotation: Option<TypeAnnotation>,
}

/// The `this: T` receiver of an extension function.
#[derive(Clone, Debug)]
pub struct ThisParam {
    pub location: SourceLocation,
    pub annotation: TypeAnnotation,
}

#[derive(Clone, Debug)]
pub struct FunctionDef {
    pub location: SourceLocation,
    pub name: Binder,
    pub type_params: Option<Vec<TypeParamDecl>>,
    pub this_param: Option<ThisParam>,
    pub params: Vec<Param>,
    pub return_type: TypeAnnotation,
    pub body: Block,
}

impl FunctionDef {
    /// Extension functions are called with method syntax on their receiver.
    pub fn is_extension(&self) -> bool {
        self.this_param.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct ExternFunctionDef {
    pub location: SourceLocation,
    pub binder: Binder,
    pub param_types: Vec<TypeAnnotation>,
    pub return_type: TypeAnnotation,
    pub extern_name: Identifier,
}

#[derive(Clone, Debug)]
pub struct StructMember {
    pub binder: Binder,
    pub annotation: TypeAnnotation,
}

#[derive(Clone, Debug)]
pub struct StructDef {
    pub location: SourceLocation,
    pub binder: Binder,
    pub type_params: Option<Vec<TypeParamDecl>>,
    pub members: Vec<StructMember>,
}

#[derive(Clone, Debug)]
pub struct ConstDef {
    pub location: SourceLocation,
    pub name: Binder,
    pub annotation: Option<TypeAnnotation>,
    pub initializer: Expression,
}

// ── Statements ─────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Block {
    pub location: SourceLocation,
    pub members: Vec<Statement>,
}

#[derive(Clone, Debug)]
pub struct Statement {
    pub location: SourceLocation,
    pub kind: StatementKind,
}

/// A `val` binding statement.
#[derive(Clone, Debug)]
pub struct ValStatement {
    pub location: SourceLocation,
    pub binder: Binder,
    pub annotation: Option<TypeAnnotation>,
    pub rhs: Expression,
}

#[derive(Clone, Debug)]
pub enum StatementKind {
    Val(ValStatement),
    Return(Expression),
    Expression(Expression),
    If {
        condition: Expression,
        then_branch: Block,
        else_branch: Option<Block>,
    },
    While {
        condition: Expression,
        body: Block,
    },
    Error,
}

impl HasLocation for Statement {
    fn location(&self) -> SourceLocation {
        self.location
    }
}

// ── Expressions ────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Expression {
    pub location: SourceLocation,
    pub kind: ExprKind,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Var(Identifier),
    Call {
        callee: Box<Expression>,
        args: Vec<Expression>,
    },
    Property {
        lhs: Box<Expression>,
        property: Identifier,
    },
    ByteString(Vec<u8>),
    BoolLiteral(bool),
    IntLiteral(i64),
    NullPtr,
    This,
    Not(Box<Expression>),
    BinaryOperation {
        lhs: Box<Expression>,
        operator: BinaryOperator,
        rhs: Box<Expression>,
    },
    SizeOf(TypeAnnotation),
    AddressOf(Box<Expression>),
    Load(Box<Expression>),
    PointerCast {
        to: TypeAnnotation,
        arg: Box<Expression>,
    },
    Error,
}

impl HasLocation for Expression {
    fn location(&self) -> SourceLocation {
        self.location
    }
}

// ── Type annotations ───────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct TypeAnnotation {
    pub location: SourceLocation,
    pub kind: TypeAnnotationKind,
}

#[derive(Clone, Debug)]
pub enum TypeAnnotationKind {
    /// A type name: a primitive, a struct, or a type parameter.
    Var(Identifier),
    /// A struct reached through an imported module, `mem.Box`.
    Qualified(QualifiedPath),
    /// `*T`
    Ptr(Box<TypeAnnotation>),
    /// `*mut T`
    MutPtr(Box<TypeAnnotation>),
    /// `Box[T]`
    Application {
        callee: Box<TypeAnnotation>,
        args: Vec<TypeAnnotation>,
    },
    /// `*fn(A, B) -> C`
    FunctionPtr {
        from: Vec<TypeAnnotation>,
        to: Box<TypeAnnotation>,
    },
    Error,
}

impl HasLocation for TypeAnnotation {
    fn location(&self) -> SourceLocation {
        self.location
    }
}
