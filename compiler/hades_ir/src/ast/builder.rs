//! Programmatic AST construction.
//!
//! `AstBuilder` hands every node a fresh, unique location within its file,
//! so trees built here behave like parsed ones under location-keyed
//! resolution and checking. All methods take `&self`, which lets calls nest:
//!
//! ```
//! # use hades_ir::{StringInterner, FileId, ast::builder::AstBuilder};
//! let interner = StringInterner::new();
//! let b = AstBuilder::new(&interner, FileId::new(0));
//! let call = b.call(b.var("identity"), vec![b.int(1)]);
//! ```

use std::cell::Cell;

use super::{
    BinaryOperator, Binder, Block, ConstDef, Declaration, DeclarationKind, ExprKind, Expression,
    ExternFunctionDef, FunctionDef, Identifier, Param, QualifiedPath, SourceFile, Statement,
    StatementKind, StructDef, StructMember, ThisParam, TypeAnnotation, TypeAnnotationKind,
    TypeParamDecl, ValStatement,
};
use crate::{FileId, QualifiedName, SourceLocation, Span, StringInterner};

pub struct AstBuilder<'i> {
    interner: &'i StringInterner,
    file: FileId,
    next_offset: Cell<u32>,
}

impl<'i> AstBuilder<'i> {
    pub fn new(interner: &'i StringInterner, file: FileId) -> Self {
        AstBuilder {
            interner,
            file,
            next_offset: Cell::new(0),
        }
    }

    pub fn file_id(&self) -> FileId {
        self.file
    }

    /// A location no other node of this builder has.
    pub fn fresh_location(&self) -> SourceLocation {
        let start = self.next_offset.get();
        self.next_offset.set(start + 1);
        SourceLocation::new(self.file, Span::new(start, start + 1))
    }

    pub fn ident(&self, name: &str) -> Identifier {
        Identifier {
            location: self.fresh_location(),
            name: self.interner.intern(name),
        }
    }

    pub fn binder(&self, name: &str) -> Binder {
        Binder::new(self.ident(name))
    }

    pub fn qualified_name(&self, path: &[&str]) -> QualifiedName {
        QualifiedName::new(path.iter().map(|s| self.interner.intern(s)).collect())
    }

    fn path(&self, path: &[&str]) -> QualifiedPath {
        QualifiedPath {
            location: self.fresh_location(),
            identifiers: path.iter().map(|s| self.ident(s)).collect(),
        }
    }

    // ── Type annotations ───────────────────────────────────────────

    fn annotation(&self, kind: TypeAnnotationKind) -> TypeAnnotation {
        TypeAnnotation {
            location: self.fresh_location(),
            kind,
        }
    }

    /// A named type: `CInt`, `Point`, `T`.
    pub fn ty(&self, name: &str) -> TypeAnnotation {
        self.annotation(TypeAnnotationKind::Var(self.ident(name)))
    }

    pub fn qualified_ty(&self, path: &[&str]) -> TypeAnnotation {
        self.annotation(TypeAnnotationKind::Qualified(self.path(path)))
    }

    pub fn ptr_ty(&self, to: TypeAnnotation) -> TypeAnnotation {
        self.annotation(TypeAnnotationKind::Ptr(Box::new(to)))
    }

    pub fn mut_ptr_ty(&self, to: TypeAnnotation) -> TypeAnnotation {
        self.annotation(TypeAnnotationKind::MutPtr(Box::new(to)))
    }

    /// `callee[args]`
    pub fn app_ty(&self, callee: &str, args: Vec<TypeAnnotation>) -> TypeAnnotation {
        let callee = Box::new(self.ty(callee));
        self.annotation(TypeAnnotationKind::Application { callee, args })
    }

    pub fn fn_ptr_ty(&self, from: Vec<TypeAnnotation>, to: TypeAnnotation) -> TypeAnnotation {
        self.annotation(TypeAnnotationKind::FunctionPtr {
            from,
            to: Box::new(to),
        })
    }

    // ── Expressions ────────────────────────────────────────────────

    fn expr(&self, kind: ExprKind) -> Expression {
        Expression {
            location: self.fresh_location(),
            kind,
        }
    }

    pub fn var(&self, name: &str) -> Expression {
        self.expr(ExprKind::Var(self.ident(name)))
    }

    pub fn call(&self, callee: Expression, args: Vec<Expression>) -> Expression {
        self.expr(ExprKind::Call {
            callee: Box::new(callee),
            args,
        })
    }

    pub fn prop(&self, lhs: Expression, property: &str) -> Expression {
        self.expr(ExprKind::Property {
            lhs: Box::new(lhs),
            property: self.ident(property),
        })
    }

    pub fn int(&self, value: i64) -> Expression {
        self.expr(ExprKind::IntLiteral(value))
    }

    pub fn bool_lit(&self, value: bool) -> Expression {
        self.expr(ExprKind::BoolLiteral(value))
    }

    pub fn byte_string(&self, bytes: &[u8]) -> Expression {
        self.expr(ExprKind::ByteString(bytes.to_vec()))
    }

    pub fn null_ptr(&self) -> Expression {
        self.expr(ExprKind::NullPtr)
    }

    pub fn this(&self) -> Expression {
        self.expr(ExprKind::This)
    }

    pub fn not(&self, e: Expression) -> Expression {
        self.expr(ExprKind::Not(Box::new(e)))
    }

    pub fn binop(&self, lhs: Expression, operator: BinaryOperator, rhs: Expression) -> Expression {
        self.expr(ExprKind::BinaryOperation {
            lhs: Box::new(lhs),
            operator,
            rhs: Box::new(rhs),
        })
    }

    pub fn size_of(&self, ty: TypeAnnotation) -> Expression {
        self.expr(ExprKind::SizeOf(ty))
    }

    pub fn address_of(&self, e: Expression) -> Expression {
        self.expr(ExprKind::AddressOf(Box::new(e)))
    }

    pub fn load(&self, e: Expression) -> Expression {
        self.expr(ExprKind::Load(Box::new(e)))
    }

    pub fn ptr_cast(&self, to: TypeAnnotation, arg: Expression) -> Expression {
        self.expr(ExprKind::PointerCast {
            to,
            arg: Box::new(arg),
        })
    }

    // ── Statements ─────────────────────────────────────────────────

    fn stmt(&self, kind: StatementKind) -> Statement {
        Statement {
            location: self.fresh_location(),
            kind,
        }
    }

    pub fn val(&self, name: &str, annotation: Option<TypeAnnotation>, rhs: Expression) -> Statement {
        let location = self.fresh_location();
        Statement {
            location,
            kind: StatementKind::Val(ValStatement {
                location,
                binder: self.binder(name),
                annotation,
                rhs,
            }),
        }
    }

    pub fn ret(&self, value: Expression) -> Statement {
        self.stmt(StatementKind::Return(value))
    }

    pub fn expr_stmt(&self, e: Expression) -> Statement {
        self.stmt(StatementKind::Expression(e))
    }

    pub fn if_stmt(&self, condition: Expression, then_branch: Block, else_branch: Option<Block>) -> Statement {
        self.stmt(StatementKind::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    pub fn while_stmt(&self, condition: Expression, body: Block) -> Statement {
        self.stmt(StatementKind::While { condition, body })
    }

    pub fn block(&self, members: Vec<Statement>) -> Block {
        Block {
            location: self.fresh_location(),
            members,
        }
    }

    // ── Declarations ───────────────────────────────────────────────

    fn decl(&self, kind: DeclarationKind) -> Declaration {
        Declaration {
            location: self.fresh_location(),
            kind,
        }
    }

    pub fn type_params(&self, names: &[&str]) -> Vec<TypeParamDecl> {
        names
            .iter()
            .map(|n| TypeParamDecl {
                binder: self.binder(n),
            })
            .collect()
    }

    pub fn param(&self, name: &str, annotation: TypeAnnotation) -> Param {
        Param {
            location: self.fresh_location(),
            binder: self.binder(name),
            annotation: Some(annotation),
        }
    }

    fn function_def(
        &self,
        name: &str,
        type_params: Option<Vec<TypeParamDecl>>,
        this_param: Option<TypeAnnotation>,
        params: Vec<Param>,
        return_type: TypeAnnotation,
        body: Block,
    ) -> Declaration {
        let location = self.fresh_location();
        let this_param = this_param.map(|annotation| ThisParam {
            location: self.fresh_location(),
            annotation,
        });
        Declaration {
            location,
            kind: DeclarationKind::Function(FunctionDef {
                location,
                name: self.binder(name),
                type_params,
                this_param,
                params,
                return_type,
                body,
            }),
        }
    }

    pub fn function(
        &self,
        name: &str,
        type_params: Option<Vec<TypeParamDecl>>,
        params: Vec<Param>,
        return_type: TypeAnnotation,
        body: Block,
    ) -> Declaration {
        self.function_def(name, type_params, None, params, return_type, body)
    }

    /// `fn<type_params>(this: this_ty) name(params) -> return_type`
    pub fn extension(
        &self,
        name: &str,
        type_params: Option<Vec<TypeParamDecl>>,
        this_ty: TypeAnnotation,
        params: Vec<Param>,
        return_type: TypeAnnotation,
        body: Block,
    ) -> Declaration {
        self.function_def(name, type_params, Some(this_ty), params, return_type, body)
    }

    pub fn extern_fn(
        &self,
        name: &str,
        param_types: Vec<TypeAnnotation>,
        return_type: TypeAnnotation,
        extern_name: &str,
    ) -> Declaration {
        let location = self.fresh_location();
        Declaration {
            location,
            kind: DeclarationKind::ExternFunction(ExternFunctionDef {
                location,
                binder: self.binder(name),
                param_types,
                return_type,
                extern_name: self.ident(extern_name),
            }),
        }
    }

    pub fn struct_def(
        &self,
        name: &str,
        type_params: Option<Vec<TypeParamDecl>>,
        members: Vec<(&str, TypeAnnotation)>,
    ) -> Declaration {
        let location = self.fresh_location();
        let members = members
            .into_iter()
            .map(|(field, annotation)| StructMember {
                binder: self.binder(field),
                annotation,
            })
            .collect();
        Declaration {
            location,
            kind: DeclarationKind::Struct(StructDef {
                location,
                binder: self.binder(name),
                type_params,
                members,
            }),
        }
    }

    pub fn const_def(&self, name: &str, annotation: Option<TypeAnnotation>, initializer: Expression) -> Declaration {
        let location = self.fresh_location();
        Declaration {
            location,
            kind: DeclarationKind::Const(ConstDef {
                location,
                name: self.binder(name),
                annotation,
                initializer,
            }),
        }
    }

    /// `import module.path as alias`
    pub fn import_as(&self, module_path: &[&str], alias: &str) -> Declaration {
        self.decl(DeclarationKind::ImportAs {
            module_path: self.path(module_path),
            as_name: self.binder(alias),
        })
    }

    pub fn source_file(&self, module: &[&str], declarations: Vec<Declaration>) -> SourceFile {
        SourceFile {
            file: self.file,
            module: self.qualified_name(module),
            declarations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_node_gets_a_distinct_location() {
        let interner = StringInterner::new();
        let b = AstBuilder::new(&interner, FileId::new(3));
        let lhs = b.var("x");
        let rhs = b.var("x");
        assert_ne!(lhs.location, rhs.location);
        assert_eq!(lhs.location.file, FileId::new(3));

        let (ExprKind::Var(a), ExprKind::Var(c)) = (&lhs.kind, &rhs.kind) else {
            panic!("expected variables");
        };
        assert_eq!(a.name, c.name);
        assert_ne!(a.location, c.location);
    }

    #[test]
    fn val_statement_shares_location_with_its_statement() {
        let interner = StringInterner::new();
        let b = AstBuilder::new(&interner, FileId::new(0));
        let stmt = b.val("x", None, b.int(1));
        let StatementKind::Val(val) = &stmt.kind else {
            panic!("expected val");
        };
        assert_eq!(val.location, stmt.location);
    }
}
