//! Statement-emitting builder for HIR blocks.
//!
//! Follows the "position, emit, finish" pattern: [`HirBuilder::build_block`]
//! opens a block, every `emit_*` call appends to the innermost open block,
//! and value-producing emits return a [`HirExpression`] reading the local
//! they bound.

use hades_ir::ast::BinaryOperator;
use hades_ir::{Name, QualifiedName, SourceLocation, StringInterner};
use hades_types::Type;

use crate::{HirBlock, HirConstant, HirExprKind, HirExpression, HirStatement, HirStatementKind};

pub struct HirBuilder<'i> {
    interner: &'i StringInterner,
    /// Location given to everything emitted next.
    pub location: SourceLocation,
    statements: Option<Vec<HirStatement>>,
    next_name: u32,
}

impl<'i> HirBuilder<'i> {
    pub fn new(interner: &'i StringInterner, location: SourceLocation) -> Self {
        HirBuilder {
            interner,
            location,
            statements: None,
            next_name: 0,
        }
    }

    pub fn interner(&self) -> &'i StringInterner {
        self.interner
    }

    // ── Names ───────────────────────────────────────────────────────

    /// A name no other call on this builder returns: `prefix$N`.
    pub fn make_unique_name(&mut self, prefix: &str) -> Name {
        let name = self.interner.intern(&format!("{prefix}${}", self.next_name));
        self.next_name += 1;
        name
    }

    pub fn make_name(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    // ── Blocks ──────────────────────────────────────────────────────

    /// Run `body` with a fresh block open and return that block. Blocks
    /// nest: the enclosing block resumes afterwards.
    pub fn build_block(&mut self, body: impl FnOnce(&mut Self)) -> HirBlock {
        let name = self.make_unique_name("block");
        self.build_named_block(name, body)
    }

    pub fn build_named_block(&mut self, name: Name, body: impl FnOnce(&mut Self)) -> HirBlock {
        let location = self.location;
        let enclosing = self.statements.replace(Vec::new());
        body(self);
        let statements = std::mem::replace(&mut self.statements, enclosing).unwrap_or_default();
        HirBlock {
            location,
            name,
            statements,
        }
    }

    /// Append `kind` to the innermost open block.
    ///
    /// # Panics
    /// When no block is open.
    pub fn emit(&mut self, kind: HirStatementKind) {
        let location = self.location;
        match &mut self.statements {
            Some(statements) => statements.push(HirStatement { location, kind }),
            None => panic!("internal error: statement emitted outside a block"),
        }
    }

    // ── Memory ──────────────────────────────────────────────────────

    /// A mutable stack slot of type `ty`. Returns a pointer to it.
    pub fn emit_alloca(&mut self, prefix: &str, ty: Type) -> HirExpression {
        let name = self.make_unique_name(prefix);
        self.emit(HirStatementKind::Alloca {
            name,
            is_mutable: true,
            ty: ty.clone(),
        });
        HirExpression::local_ref(self.location, Type::mut_ptr(ty), name)
    }

    /// A stack slot initialized with `rhs`. Returns a pointer to it.
    pub fn alloca_assign(&mut self, prefix: &str, rhs: HirExpression) -> HirExpression {
        let ptr = self.emit_alloca(prefix, rhs.ty.clone());
        self.emit_store(ptr.clone(), rhs);
        ptr
    }

    /// # Panics
    /// When `ptr` is not a mutable pointer.
    pub fn emit_store(&mut self, ptr: HirExpression, value: HirExpression) {
        assert!(
            ptr.ty.is_mutable_ptr(),
            "internal error: store through a value that is not a mutable pointer"
        );
        self.emit(HirStatementKind::Store { ptr, value });
    }

    /// # Panics
    /// When `ptr` is not a pointer.
    pub fn emit_load(&mut self, ptr: HirExpression) -> HirExpression {
        let Some(to) = ptr.ty.pointee().cloned() else {
            panic!("internal error: load from a value that is not a pointer");
        };
        let name = self.make_unique_name("load");
        self.emit(HirStatementKind::Load { name, ptr });
        HirExpression::local_ref(self.location, to, name)
    }

    // ── Values ──────────────────────────────────────────────────────

    pub fn emit_call(
        &mut self,
        result_type: Type,
        callee: HirExpression,
        args: Vec<HirExpression>,
        type_args: Option<Vec<Type>>,
    ) -> HirExpression {
        let name = self.make_unique_name("call");
        self.emit(HirStatementKind::Call {
            name,
            result_type: result_type.clone(),
            callee,
            args,
            type_args,
        });
        HirExpression::local_ref(self.location, result_type, name)
    }

    pub fn emit_type_application(
        &mut self,
        ty: Type,
        expression: HirExpression,
        args: Vec<Type>,
    ) -> HirExpression {
        let name = self.make_unique_name("inst");
        self.emit(HirStatementKind::TypeApplication {
            name,
            ty: ty.clone(),
            expression,
            args,
        });
        HirExpression::local_ref(self.location, ty, name)
    }

    pub fn emit_binop(
        &mut self,
        ty: Type,
        lhs: HirExpression,
        operator: BinaryOperator,
        rhs: HirExpression,
    ) -> HirExpression {
        let name = self.make_unique_name("op");
        self.emit(HirStatementKind::BinOp {
            name,
            ty: ty.clone(),
            lhs,
            operator,
            rhs,
        });
        HirExpression::local_ref(self.location, ty, name)
    }

    pub fn emit_not(&mut self, expression: HirExpression) -> HirExpression {
        let name = self.make_unique_name("not");
        self.emit(HirStatementKind::Not { name, expression });
        HirExpression::local_ref(self.location, Type::Bool, name)
    }

    pub fn emit_return(&mut self, value: HirExpression) {
        self.emit(HirStatementKind::Return(value));
    }

    /// `lhs.field` of a struct value.
    pub fn get_struct_field(
        &mut self,
        lhs: HirExpression,
        field: Name,
        index: usize,
        ty: Type,
    ) -> HirExpression {
        let name = self.make_unique_name("field");
        self.emit(HirStatementKind::GetStructField {
            name,
            ty: ty.clone(),
            lhs,
            field,
            index,
        });
        HirExpression::local_ref(self.location, ty, name)
    }

    /// Pointer to `field` of the struct `lhs` points to. `ty` is the
    /// resulting pointer type.
    ///
    /// # Panics
    /// When `ty` is not a pointer type.
    pub fn field_ptr(
        &mut self,
        lhs: HirExpression,
        field: Name,
        index: usize,
        ty: Type,
    ) -> HirExpression {
        assert!(
            ty.pointee().is_some(),
            "internal error: field pointer of a non-pointer type"
        );
        let name = self.make_unique_name("field_ptr");
        self.emit(HirStatementKind::GetStructFieldPointer {
            name,
            ty: ty.clone(),
            lhs,
            field,
            index,
        });
        HirExpression::local_ref(self.location, ty, name)
    }

    /// `value` reinterpreted as a pointer to `to`, keeping its mutability.
    pub fn ptr_cast(&mut self, value: HirExpression, to: Type) -> HirExpression {
        let ty = if value.ty.is_mutable_ptr() {
            Type::mut_ptr(to.clone())
        } else {
            Type::ptr(to.clone())
        };
        let name = self.make_unique_name("cast");
        self.emit(HirStatementKind::PointerCast {
            name,
            to_pointer_of_type: to,
            value,
        });
        HirExpression::local_ref(self.location, ty, name)
    }

    // ── Leaves ──────────────────────────────────────────────────────

    pub fn global_ref(&self, name: QualifiedName, ty: Type) -> HirExpression {
        HirExpression::global_ref(self.location, ty, name)
    }

    pub fn param_ref(&self, name: Name, ty: Type) -> HirExpression {
        HirExpression::param_ref(self.location, ty, name)
    }

    pub fn int_value(&self, value: i64) -> HirExpression {
        HirExpression::constant(self.location, Type::CInt, HirConstant::Int(value))
    }

    pub fn true_value(&self) -> HirExpression {
        self.bool_value(true)
    }

    pub fn false_value(&self) -> HirExpression {
        self.bool_value(false)
    }

    fn bool_value(&self, value: bool) -> HirExpression {
        HirExpression::constant(self.location, Type::Bool, HirConstant::Bool(value))
    }

    pub fn void_value(&self) -> HirExpression {
        HirExpression::new(
            self.location,
            Type::Void,
            HirExprKind::Constant(HirConstant::Void),
        )
    }
}
