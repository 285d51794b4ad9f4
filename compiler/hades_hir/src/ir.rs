//! HIR node types.
//!
//! # Shape
//!
//! - **[`HirDefinition`]**: a top-level item of a [`HirModule`](crate::HirModule)
//! - **[`HirBlock`]**: a named, ordered list of statements
//! - **[`HirStatement`]**: the only place side effects live. Value-producing
//!   statements bind a fresh local `name`, read back with
//!   [`HirExprKind::LocalRef`].
//! - **[`HirExpression`]**: a side-effect-free typed value
//!
//! Locals are stack slots (`Alloca`/`Load`/`Store`), not SSA values. Control
//! flow is structured: branches and loops embed their blocks, and `Jump`
//! names an enclosing block to leave.

use hades_ir::ast::{Binder, BinaryOperator, Identifier};
use hades_ir::{Name, QualifiedName, SourceLocation};
use hades_types::{FunctionType, Type, TypeParam};

// ── Definitions ─────────────────────────────────────────────────────

/// A type parameter of a generic definition. Its location is the binder
/// location that `Type::ParamRef` occurrences in the definition refer to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HirTypeParam {
    pub location: SourceLocation,
    pub name: Name,
}

impl HirTypeParam {
    /// The type written by an occurrence of this parameter.
    pub fn param_ref(&self) -> Type {
        Type::ParamRef(self.binder())
    }

    fn binder(&self) -> Binder {
        Binder::new(Identifier {
            location: self.location,
            name: self.name,
        })
    }
}

impl From<TypeParam> for HirTypeParam {
    fn from(param: TypeParam) -> Self {
        HirTypeParam {
            location: param.location(),
            name: param.binder.name(),
        }
    }
}

impl From<HirTypeParam> for TypeParam {
    fn from(param: HirTypeParam) -> Self {
        TypeParam {
            binder: param.binder(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HirParam {
    pub location: SourceLocation,
    pub name: Name,
    pub ty: Type,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HirFunctionSignature {
    pub location: SourceLocation,
    pub name: QualifiedName,
    pub type_params: Option<Vec<HirTypeParam>>,
    pub receiver_type: Option<Type>,
    pub params: Vec<HirParam>,
    pub return_type: Type,
}

impl HirFunctionSignature {
    /// Type of a reference to this function: a pointer to its function type.
    pub fn function_ptr_type(&self) -> Type {
        Type::ptr(Type::function(FunctionType {
            receiver: self.receiver_type.clone(),
            type_params: self
                .type_params
                .as_ref()
                .map(|params| params.iter().copied().map(TypeParam::from).collect()),
            from: self.params.iter().map(|param| param.ty.clone()).collect(),
            to: self.return_type.clone(),
        }))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HirFunction {
    pub location: SourceLocation,
    pub signature: HirFunctionSignature,
    pub body: HirBlock,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HirStruct {
    pub location: SourceLocation,
    pub name: QualifiedName,
    pub type_params: Option<Vec<HirTypeParam>>,
    /// Fields in declaration order; a field's position is its index.
    pub fields: Vec<(Name, Type)>,
}

impl HirStruct {
    pub fn field_index(&self, name: Name) -> Option<usize> {
        self.fields.iter().position(|(field, _)| *field == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HirExternFunction {
    pub location: SourceLocation,
    pub name: QualifiedName,
    pub params: Vec<Type>,
    pub return_type: Type,
    pub extern_name: Name,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HirConst {
    pub location: SourceLocation,
    pub name: QualifiedName,
    pub initializer: HirExpression,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HirDefinition {
    Function(HirFunction),
    Struct(HirStruct),
    ExternFunction(HirExternFunction),
    Const(HirConst),
}

impl HirDefinition {
    pub fn name(&self) -> &QualifiedName {
        match self {
            HirDefinition::Function(def) => &def.signature.name,
            HirDefinition::Struct(def) => &def.name,
            HirDefinition::ExternFunction(def) => &def.name,
            HirDefinition::Const(def) => &def.name,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            HirDefinition::Function(def) => def.location,
            HirDefinition::Struct(def) => def.location,
            HirDefinition::ExternFunction(def) => def.location,
            HirDefinition::Const(def) => def.location,
        }
    }

    /// Type parameters of a generic function or struct.
    pub fn type_params(&self) -> Option<&[HirTypeParam]> {
        match self {
            HirDefinition::Function(def) => def.signature.type_params.as_deref(),
            HirDefinition::Struct(def) => def.type_params.as_deref(),
            HirDefinition::ExternFunction(_) | HirDefinition::Const(_) => None,
        }
    }

    pub fn is_generic(&self) -> bool {
        self.type_params().is_some()
    }
}

// ── Blocks and statements ───────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HirBlock {
    pub location: SourceLocation,
    pub name: Name,
    pub statements: Vec<HirStatement>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HirStatement {
    pub location: SourceLocation,
    pub kind: HirStatementKind,
}

/// One arm of a [`HirStatementKind::MatchInt`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchIntArm {
    pub value: i64,
    pub block: HirBlock,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HirStatementKind {
    /// A named stack slot of type `ty`.
    Alloca {
        name: Name,
        is_mutable: bool,
        ty: Type,
    },
    /// `*ptr = value`. `ptr` must have a mutable pointer type.
    Store {
        ptr: HirExpression,
        value: HirExpression,
    },
    /// `name = *ptr`
    Load { name: Name, ptr: HirExpression },
    /// `name = value`
    Move { name: Name, value: HirExpression },
    /// `name = callee(args)`. `type_args` is set on calls to generic
    /// functions until monomorphization rewrites the callee.
    Call {
        name: Name,
        result_type: Type,
        callee: HirExpression,
        args: Vec<HirExpression>,
        type_args: Option<Vec<Type>>,
    },
    /// Pairs a function with a context pointer into a closure value.
    AllocateClosure {
        name: Name,
        ty: Type,
        function: HirExpression,
        ctx_ptr: HirExpression,
    },
    InvokeClosure {
        name: Name,
        result_type: Type,
        closure: HirExpression,
        args: Vec<HirExpression>,
    },
    /// `name = lhs.field`, where `field` sits at `index` in the struct.
    GetStructField {
        name: Name,
        ty: Type,
        lhs: HirExpression,
        field: Name,
        index: usize,
    },
    /// `name = &lhs->field`, where `lhs` points to the struct.
    GetStructFieldPointer {
        name: Name,
        ty: Type,
        lhs: HirExpression,
        field: Name,
        index: usize,
    },
    Memcpy {
        destination: HirExpression,
        source: HirExpression,
        bytes: HirExpression,
    },
    IntegerConvert {
        name: Name,
        ty: Type,
        value: HirExpression,
    },
    PointerCast {
        name: Name,
        to_pointer_of_type: Type,
        value: HirExpression,
    },
    Not {
        name: Name,
        expression: HirExpression,
    },
    BinOp {
        name: Name,
        ty: Type,
        lhs: HirExpression,
        operator: BinaryOperator,
        rhs: HirExpression,
    },
    /// `name = expression[args]`: a generic global awaiting instantiation.
    TypeApplication {
        name: Name,
        ty: Type,
        expression: HirExpression,
        args: Vec<Type>,
    },
    Return(HirExpression),
    /// Leave the enclosing block with this name.
    Jump(Name),
    SwitchInt {
        condition: HirExpression,
        on_true: HirBlock,
        on_false: HirBlock,
    },
    MatchInt {
        value: HirExpression,
        arms: Vec<MatchIntArm>,
        otherwise: HirBlock,
    },
    /// Runs `condition_block`, which leaves its result in `condition_name`,
    /// then `body` while the result is true.
    While {
        condition_name: Name,
        condition_block: HirBlock,
        body: HirBlock,
    },
}

// ── Expressions ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HirExpression {
    pub location: SourceLocation,
    pub ty: Type,
    pub kind: HirExprKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HirExprKind {
    /// A function, struct constructor, extern or const.
    GlobalRef(QualifiedName),
    /// A parameter of the enclosing function.
    ParamRef(Name),
    /// A local bound by an earlier statement.
    LocalRef(Name),
    /// A method of a trait applied to `trait_args`.
    TraitMethodRef {
        trait_name: QualifiedName,
        trait_args: Vec<Type>,
        method: Name,
    },
    Constant(HirConstant),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HirConstant {
    Int(i64),
    Bool(bool),
    ByteString(Vec<u8>),
    NullPtr,
    /// Size in bytes of the carried type.
    SizeOf(Type),
    Void,
}

impl HirExpression {
    pub fn new(location: SourceLocation, ty: Type, kind: HirExprKind) -> Self {
        HirExpression { location, ty, kind }
    }

    pub fn global_ref(location: SourceLocation, ty: Type, name: QualifiedName) -> Self {
        HirExpression::new(location, ty, HirExprKind::GlobalRef(name))
    }

    pub fn local_ref(location: SourceLocation, ty: Type, name: Name) -> Self {
        HirExpression::new(location, ty, HirExprKind::LocalRef(name))
    }

    pub fn param_ref(location: SourceLocation, ty: Type, name: Name) -> Self {
        HirExpression::new(location, ty, HirExprKind::ParamRef(name))
    }

    pub fn constant(location: SourceLocation, ty: Type, constant: HirConstant) -> Self {
        HirExpression::new(location, ty, HirExprKind::Constant(constant))
    }
}
