#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use hades_ir::ast::builder::AstBuilder;
use hades_ir::ast::{BinaryOperator, ExprKind, Expression};
use hades_ir::FileId;
use hades_resolve::ScopeResolver;
use pretty_assertions::assert_eq;

// ── Fixtures ────────────────────────────────────────────────────────

fn program(b: &AstBuilder<'_>, declarations: Vec<Declaration>) -> Program {
    Program {
        files: vec![b.source_file(&["main"], declarations)],
    }
}

fn check<'a>(program: &'a Program, interner: &StringInterner) -> TypedProgram<'a> {
    let resolver = ScopeResolver::new(program);
    let mut checker = Checker::new(&resolver, interner);
    checker.check_program(program);
    checker.finish()
}

fn error_kinds(typed: &TypedProgram<'_>) -> Vec<TypeErrorKind> {
    typed.errors().iter().map(|e| e.kind.clone()).collect()
}

fn function(program: &Program, index: usize) -> &FunctionDef {
    match &program.files[0].declarations[index].kind {
        DeclarationKind::Function(def) => def,
        other => panic!("expected a function, found {other:?}"),
    }
}

fn struct_def(program: &Program, index: usize) -> &StructDef {
    match &program.files[0].declarations[index].kind {
        DeclarationKind::Struct(def) => def,
        other => panic!("expected a struct, found {other:?}"),
    }
}

/// The expression of statement `index` in the body of function `function`.
fn expression(program: &Program, function_index: usize, index: usize) -> &Expression {
    match &function(program, function_index).body.members[index].kind {
        StatementKind::Return(value) | StatementKind::Expression(value) => value,
        StatementKind::Val(val) => &val.rhs,
        other => panic!("expected an expression, found {other:?}"),
    }
}

fn val_binder(program: &Program, function_index: usize, index: usize) -> Binder {
    match &function(program, function_index).body.members[index].kind {
        StatementKind::Val(val) => val.binder,
        other => panic!("expected a val, found {other:?}"),
    }
}

fn point(b: &AstBuilder<'_>) -> Declaration {
    b.struct_def("Point", None, vec![("x", b.ty("CInt"))])
}

// ── Generic calls ───────────────────────────────────────────────────

#[test]
fn generic_call_infers_type_arguments() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            b.function(
                "identity",
                Some(b.type_params(&["T"])),
                vec![b.param("x", b.ty("T"))],
                b.ty("T"),
                b.block(vec![b.ret(b.var("x"))]),
            ),
            b.function(
                "main",
                None,
                vec![],
                b.ty("CInt"),
                b.block(vec![
                    b.val("a", None, b.call(b.var("identity"), vec![b.int(1)])),
                    b.val("c", None, b.call(b.var("identity"), vec![b.bool_lit(true)])),
                    b.ret(b.var("a")),
                ]),
            ),
        ],
    );
    let typed = check(&program, &interner);

    assert_eq!(error_kinds(&typed), vec![]);
    let int_call = expression(&program, 1, 0);
    let bool_call = expression(&program, 1, 1);
    assert_eq!(typed.type_args(int_call), Some(&[Type::CInt][..]));
    assert_eq!(typed.type_args(bool_call), Some(&[Type::Bool][..]));
    assert_eq!(typed.expression_type(bool_call), Some(&Type::Bool));

    let ExprKind::Call { callee, .. } = &int_call.kind else {
        unreachable!()
    };
    assert_eq!(typed.type_args(callee.as_ref()), Some(&[Type::CInt][..]));
}

#[test]
fn uninferrable_type_argument_is_reported_and_poisoned() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            b.function(
                "make",
                Some(b.type_params(&["T"])),
                vec![],
                b.ty("CInt"),
                b.block(vec![b.ret(b.int(0))]),
            ),
            b.function(
                "main",
                None,
                vec![],
                b.ty("CInt"),
                b.block(vec![b.ret(b.call(b.var("make"), vec![]))]),
            ),
        ],
    );
    let typed = check(&program, &interner);

    let param = function(&program, 0).type_params.as_ref().unwrap()[0].binder;
    assert_eq!(
        error_kinds(&typed),
        vec![TypeErrorKind::UninferrableTypeParam(param)]
    );
    assert_eq!(
        typed.type_args(expression(&program, 1, 0)),
        Some(&[Type::Error][..])
    );
}

#[test]
fn generic_struct_flows_into_generic_function() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            b.struct_def("Box", Some(b.type_params(&["T"])), vec![("value", b.ty("T"))]),
            b.function(
                "unwrap",
                Some(b.type_params(&["T"])),
                vec![b.param("b", b.app_ty("Box", vec![b.ty("T")]))],
                b.ty("T"),
                b.block(vec![b.ret(b.prop(b.var("b"), "value"))]),
            ),
            b.function(
                "main",
                None,
                vec![],
                b.ty("CInt"),
                b.block(vec![
                    b.val("boxed", None, b.call(b.var("Box"), vec![b.int(1)])),
                    b.ret(b.call(b.var("unwrap"), vec![b.var("boxed")])),
                ]),
            ),
        ],
    );
    let typed = check(&program, &interner);

    assert_eq!(error_kinds(&typed), vec![]);
    let boxed = typed.binder_type(&val_binder(&program, 2, 0)).unwrap();
    assert_eq!(boxed.display(&interner).to_string(), "main.Box[CInt]");
    assert_eq!(
        typed.type_args(expression(&program, 2, 1)),
        Some(&[Type::CInt][..])
    );
    assert_eq!(
        typed.expression_type(expression(&program, 2, 1)),
        Some(&Type::CInt)
    );
}

#[test]
fn generic_struct_without_arguments_is_incomplete() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            b.struct_def("Box", Some(b.type_params(&["T"])), vec![("value", b.ty("T"))]),
            b.function(
                "f",
                None,
                vec![b.param("b", b.ty("Box"))],
                b.ty("Void"),
                b.block(vec![]),
            ),
        ],
    );
    let typed = check(&program, &interner);
    assert_eq!(
        error_kinds(&typed),
        vec![TypeErrorKind::IncompleteType {
            missing_param_count: 1
        }]
    );
}

// ── Arity ───────────────────────────────────────────────────────────

fn add(b: &AstBuilder<'_>) -> Declaration {
    b.function(
        "add",
        None,
        vec![b.param("a", b.ty("CInt")), b.param("b", b.ty("CInt"))],
        b.ty("CInt"),
        b.block(vec![b.ret(b.binop(b.var("a"), BinaryOperator::Plus, b.var("b")))]),
    )
}

#[test]
fn missing_arguments_do_not_stop_checking() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            add(&b),
            b.function(
                "main",
                None,
                vec![],
                b.ty("CInt"),
                b.block(vec![
                    b.val("x", None, b.call(b.var("add"), vec![b.int(1)])),
                    b.val("y", Some(b.ty("Bool")), b.int(2)),
                    b.ret(b.var("x")),
                ]),
            ),
        ],
    );
    let typed = check(&program, &interner);

    assert_eq!(
        error_kinds(&typed),
        vec![
            TypeErrorKind::MissingArgs { required: 2 },
            TypeErrorKind::TypeNotAssignable {
                source: Type::CInt,
                destination: Type::Bool,
            },
        ]
    );
    assert_eq!(
        typed.binder_type(&val_binder(&program, 1, 0)),
        Some(&Type::CInt)
    );
}

#[test]
fn excess_arguments_are_still_inferred() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            add(&b),
            b.function(
                "main",
                None,
                vec![],
                b.ty("CInt"),
                b.block(vec![b.ret(b.call(
                    b.var("add"),
                    vec![b.int(1), b.int(2), b.bool_lit(true)],
                ))]),
            ),
        ],
    );
    let typed = check(&program, &interner);

    assert_eq!(
        error_kinds(&typed),
        vec![TypeErrorKind::TooManyArgs { required: 2 }]
    );
    let ExprKind::Call { args, .. } = &expression(&program, 1, 0).kind else {
        unreachable!()
    };
    assert_eq!(typed.expression_type(&args[2]), Some(&Type::Bool));
}

#[test]
fn calling_a_non_function_is_reported() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![b.function(
            "main",
            None,
            vec![],
            b.ty("CInt"),
            b.block(vec![
                b.val("x", None, b.int(1)),
                b.ret(b.call(b.var("x"), vec![b.int(2)])),
            ]),
        )],
    );
    let typed = check(&program, &interner);
    assert_eq!(
        error_kinds(&typed),
        vec![TypeErrorKind::TypeNotCallable(Type::CInt)]
    );
}

#[test]
fn method_value_cannot_be_called_without_its_receiver() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            point(&b),
            b.extension(
                "double",
                None,
                b.ty("Point"),
                vec![],
                b.ty("CInt"),
                b.block(vec![b.ret(b.prop(b.this(), "x"))]),
            ),
            b.function(
                "main",
                None,
                vec![b.param("p", b.ty("Point"))],
                b.ty("CInt"),
                b.block(vec![
                    b.val("f", None, b.prop(b.var("p"), "double")),
                    b.ret(b.call(b.var("f"), vec![b.int(1)])),
                ]),
            ),
        ],
    );
    let typed = check(&program, &interner);

    let kinds = error_kinds(&typed);
    assert_eq!(kinds.len(), 1);
    assert!(
        matches!(&kinds[0], TypeErrorKind::TypeNotCallable(Type::Function(f)) if f.receiver.is_some()),
        "expected TypeNotCallable, found {:?}",
        kinds[0]
    );
    let ExprKind::Call { args, .. } = &expression(&program, 2, 1).kind else {
        unreachable!()
    };
    assert_eq!(typed.expression_type(&args[0]), Some(&Type::CInt));
    assert_eq!(
        typed.expression_type(expression(&program, 2, 1)),
        Some(&Type::Error)
    );
}

// ── Operators and literals ──────────────────────────────────────────

#[test]
fn equality_checks_rhs_against_lhs_first() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![b.function(
            "main",
            None,
            vec![],
            b.ty("Bool"),
            b.block(vec![b.ret(b.binop(
                b.int(1),
                BinaryOperator::Equals,
                b.bool_lit(true),
            ))]),
        )],
    );
    let typed = check(&program, &interner);
    assert_eq!(
        error_kinds(&typed),
        vec![TypeErrorKind::TypeNotAssignable {
            source: Type::Bool,
            destination: Type::CInt,
        }]
    );
}

#[test]
fn pointers_compare_regardless_of_mutability() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![b.function(
            "main",
            None,
            vec![b.param("q", b.ptr_ty(b.ty("CInt")))],
            b.ty("Bool"),
            b.block(vec![
                b.val("x", None, b.int(1)),
                b.val(
                    "same",
                    None,
                    b.binop(b.address_of(b.var("x")), BinaryOperator::Equals, b.var("q")),
                ),
                b.ret(b.binop(
                    b.var("q"),
                    BinaryOperator::NotEquals,
                    b.address_of(b.var("x")),
                )),
            ]),
        )],
    );
    let typed = check(&program, &interner);

    assert_eq!(error_kinds(&typed), vec![]);
    assert_eq!(
        typed.binder_type(&val_binder(&program, 0, 1)),
        Some(&Type::Bool)
    );
}

#[test]
fn structs_are_not_equality_comparable() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            point(&b),
            b.function(
                "same",
                None,
                vec![b.param("p", b.ty("Point"))],
                b.ty("Bool"),
                b.block(vec![b.ret(b.binop(
                    b.var("p"),
                    BinaryOperator::NotEquals,
                    b.var("p"),
                ))]),
            ),
        ],
    );
    let typed = check(&program, &interner);
    let kinds = error_kinds(&typed);
    assert_eq!(kinds.len(), 1);
    assert!(matches!(
        kinds[0],
        TypeErrorKind::TypeNotEqualityComparable(Type::Struct(_))
    ));
}

#[test]
fn operator_table_rejects_bool_arithmetic() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![b.function(
            "main",
            None,
            vec![],
            b.ty("CInt"),
            b.block(vec![b.ret(b.binop(
                b.bool_lit(true),
                BinaryOperator::Plus,
                b.int(1),
            ))]),
        )],
    );
    let typed = check(&program, &interner);
    assert_eq!(
        error_kinds(&typed),
        vec![TypeErrorKind::OperatorNotApplicable(BinaryOperator::Plus)]
    );
}

#[test]
fn int_literal_checks_against_size() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![b.function(
            "next",
            None,
            vec![b.param("n", b.ty("Size"))],
            b.ty("Size"),
            b.block(vec![b.ret(b.binop(b.var("n"), BinaryOperator::Plus, b.int(1)))]),
        )],
    );
    let typed = check(&program, &interner);
    assert_eq!(error_kinds(&typed), vec![]);
    let ExprKind::BinaryOperation { rhs, .. } = &expression(&program, 0, 0).kind else {
        unreachable!()
    };
    assert_eq!(typed.expression_type(rhs.as_ref()), Some(&Type::Size));
}

#[test]
fn null_needs_a_pointer_context() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            b.function(
                "nothing",
                None,
                vec![],
                b.ptr_ty(b.ty("CInt")),
                b.block(vec![b.ret(b.null_ptr())]),
            ),
            b.function(
                "ambiguous",
                None,
                vec![],
                b.ty("Void"),
                b.block(vec![b.val("n", None, b.null_ptr())]),
            ),
        ],
    );
    let typed = check(&program, &interner);
    assert_eq!(
        error_kinds(&typed),
        vec![TypeErrorKind::AmbiguousExpression]
    );
    assert_eq!(
        typed.expression_type(expression(&program, 0, 0)),
        Some(&Type::ptr(Type::CInt))
    );
}

#[test]
fn conditions_must_be_bool() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![b.function(
            "main",
            None,
            vec![],
            b.ty("Void"),
            b.block(vec![
                b.if_stmt(b.int(1), b.block(vec![]), None),
                b.while_stmt(b.not(b.bool_lit(false)), b.block(vec![])),
            ]),
        )],
    );
    let typed = check(&program, &interner);
    assert_eq!(
        error_kinds(&typed),
        vec![TypeErrorKind::TypeNotAssignable {
            source: Type::CInt,
            destination: Type::Bool,
        }]
    );
}

// ── Pointers ────────────────────────────────────────────────────────

#[test]
fn only_vals_are_addressable() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![b.function(
            "f",
            None,
            vec![b.param("p", b.ty("CInt"))],
            b.ty("Void"),
            b.block(vec![
                b.val("x", None, b.int(1)),
                b.val("a", None, b.address_of(b.var("x"))),
                b.val("c", None, b.address_of(b.var("p"))),
                b.val("d", None, b.load(b.var("a"))),
            ]),
        )],
    );
    let typed = check(&program, &interner);

    assert_eq!(
        error_kinds(&typed),
        vec![TypeErrorKind::NotAnAddressableValue]
    );
    assert_eq!(
        typed.binder_type(&val_binder(&program, 0, 1)),
        Some(&Type::mut_ptr(Type::CInt))
    );
    assert_eq!(
        typed.binder_type(&val_binder(&program, 0, 2)),
        Some(&Type::ptr(Type::CInt))
    );
    assert_eq!(
        typed.binder_type(&val_binder(&program, 0, 3)),
        Some(&Type::CInt)
    );
}

#[test]
fn pointer_cast_keeps_mutability() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![b.function(
            "f",
            None,
            vec![b.param("p", b.mut_ptr_ty(b.ty("CInt")))],
            b.mut_ptr_ty(b.ty("Byte")),
            b.block(vec![
                b.val("bad", None, b.ptr_cast(b.ty("Byte"), b.int(0))),
                b.ret(b.ptr_cast(b.ty("Byte"), b.var("p"))),
            ]),
        )],
    );
    let typed = check(&program, &interner);
    assert_eq!(
        error_kinds(&typed),
        vec![TypeErrorKind::NotAPointerType(Type::CInt)]
    );
    assert_eq!(
        typed.binder_type(&val_binder(&program, 0, 0)),
        Some(&Type::ptr(Type::Byte))
    );
}

#[test]
fn load_of_non_pointer_is_reported() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![b.function(
            "f",
            None,
            vec![],
            b.ty("CInt"),
            b.block(vec![b.ret(b.load(b.int(3)))]),
        )],
    );
    let typed = check(&program, &interner);
    assert_eq!(
        error_kinds(&typed),
        vec![TypeErrorKind::NotAPointerType(Type::CInt)]
    );
}

// ── Properties ──────────────────────────────────────────────────────

#[test]
fn extension_is_found_after_field_lookup_fails() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            point(&b),
            b.extension(
                "double",
                None,
                b.ty("Point"),
                vec![],
                b.ty("CInt"),
                b.block(vec![b.ret(b.binop(
                    b.prop(b.this(), "x"),
                    BinaryOperator::Plus,
                    b.prop(b.this(), "x"),
                ))]),
            ),
            b.function(
                "main",
                None,
                vec![b.param("p", b.ty("Point"))],
                b.ty("CInt"),
                b.block(vec![b.ret(b.call(b.prop(b.var("p"), "double"), vec![]))]),
            ),
        ],
    );
    let typed = check(&program, &interner);

    assert_eq!(error_kinds(&typed), vec![]);
    let ExprKind::Call { callee, .. } = &expression(&program, 2, 0).kind else {
        unreachable!()
    };
    let extension = typed.extension_def(callee.as_ref()).unwrap();
    assert_eq!(extension.location, function(&program, 1).location);
    assert_eq!(
        typed.expression_type(expression(&program, 2, 0)),
        Some(&Type::CInt)
    );
}

#[test]
fn field_wins_over_extension_of_the_same_name() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            point(&b),
            b.extension(
                "x",
                None,
                b.ty("Point"),
                vec![],
                b.ty("Bool"),
                b.block(vec![b.ret(b.bool_lit(true))]),
            ),
            b.function(
                "main",
                None,
                vec![b.param("p", b.ty("Point"))],
                b.ty("CInt"),
                b.block(vec![b.ret(b.prop(b.var("p"), "x"))]),
            ),
        ],
    );
    let typed = check(&program, &interner);

    assert_eq!(error_kinds(&typed), vec![]);
    assert!(typed.extension_def(expression(&program, 2, 0)).is_none());
}

#[test]
fn generic_extension_unifies_its_receiver() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            b.extension(
                "deref",
                Some(b.type_params(&["T"])),
                b.ptr_ty(b.ty("T")),
                vec![],
                b.ty("T"),
                b.block(vec![b.ret(b.load(b.this()))]),
            ),
            b.function(
                "main",
                None,
                vec![b.param("p", b.ptr_ty(b.ty("Bool")))],
                b.ty("Bool"),
                b.block(vec![b.ret(b.call(b.prop(b.var("p"), "deref"), vec![]))]),
            ),
        ],
    );
    let typed = check(&program, &interner);

    assert_eq!(error_kinds(&typed), vec![]);
    let call = expression(&program, 1, 0);
    assert_eq!(typed.type_args(call), Some(&[Type::Bool][..]));
    assert_eq!(typed.expression_type(call), Some(&Type::Bool));
}

#[test]
fn immutable_pointer_extension_accepts_mutable_receiver() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            point(&b),
            b.extension(
                "get",
                None,
                b.ptr_ty(b.ty("Point")),
                vec![],
                b.ty("CInt"),
                b.block(vec![b.ret(b.prop(b.load(b.this()), "x"))]),
            ),
            b.function(
                "main",
                None,
                vec![b.param("q", b.ty("Point"))],
                b.ty("CInt"),
                b.block(vec![
                    b.val("p", None, b.var("q")),
                    b.val("pp", None, b.address_of(b.var("p"))),
                    b.ret(b.call(b.prop(b.var("pp"), "get"), vec![])),
                ]),
            ),
        ],
    );
    let typed = check(&program, &interner);

    assert_eq!(error_kinds(&typed), vec![]);
    let ExprKind::Call { callee, .. } = &expression(&program, 2, 2).kind else {
        unreachable!()
    };
    let extension = typed.extension_def(callee.as_ref()).unwrap();
    assert_eq!(extension.location, function(&program, 1).location);
}

/// `fn(this: CInt) name() -> returns { return value }`
fn int_extension(b: &AstBuilder<'_>, name: &str, returns: &str, value: Expression) -> Declaration {
    b.extension(
        name,
        None,
        b.ty("CInt"),
        vec![],
        b.ty(returns),
        b.block(vec![b.ret(value)]),
    )
}

#[test]
fn first_declared_extension_wins() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            int_extension(&b, "twice", "CInt", b.int(2)),
            int_extension(&b, "twice", "Bool", b.bool_lit(true)),
            b.function(
                "main",
                None,
                vec![b.param("n", b.ty("CInt"))],
                b.ty("CInt"),
                b.block(vec![b.ret(b.call(b.prop(b.var("n"), "twice"), vec![]))]),
            ),
        ],
    );
    let typed = check(&program, &interner);

    assert_eq!(error_kinds(&typed), vec![]);
    let ExprKind::Call { callee, .. } = &expression(&program, 2, 0).kind else {
        unreachable!()
    };
    let extension = typed.extension_def(callee.as_ref()).unwrap();
    assert_eq!(extension.location, function(&program, 0).location);
}

#[test]
fn current_file_extension_wins_over_imported_one() {
    let interner = StringInterner::new();
    let lib = AstBuilder::new(&interner, FileId::new(0));
    let main = AstBuilder::new(&interner, FileId::new(1));
    let program = Program {
        files: vec![
            lib.source_file(
                &["lib"],
                vec![int_extension(&lib, "twice", "Bool", lib.bool_lit(true))],
            ),
            main.source_file(
                &["main"],
                vec![
                    main.import_as(&["lib"], "lib"),
                    main.function(
                        "main",
                        None,
                        vec![main.param("n", main.ty("CInt"))],
                        main.ty("CInt"),
                        main.block(vec![main.ret(main.call(
                            main.prop(main.var("n"), "twice"),
                            vec![],
                        ))]),
                    ),
                    int_extension(&main, "twice", "CInt", main.int(2)),
                ],
            ),
        ],
    };
    let typed = check(&program, &interner);

    assert_eq!(error_kinds(&typed), vec![]);
    let declarations = &program.files[1].declarations;
    let (DeclarationKind::Function(caller), DeclarationKind::Function(local)) =
        (&declarations[1].kind, &declarations[2].kind)
    else {
        unreachable!()
    };
    let StatementKind::Return(call) = &caller.body.members[0].kind else {
        unreachable!()
    };
    let ExprKind::Call { callee, .. } = &call.kind else {
        unreachable!()
    };
    let extension = typed.extension_def(callee.as_ref()).unwrap();
    assert_eq!(extension.location, local.location);
    assert_eq!(typed.expression_type(call), Some(&Type::CInt));
}

#[test]
fn unknown_property_is_reported() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            point(&b),
            b.function(
                "main",
                None,
                vec![b.param("p", b.ty("Point"))],
                b.ty("CInt"),
                b.block(vec![b.ret(b.prop(b.var("p"), "y"))]),
            ),
        ],
    );
    let typed = check(&program, &interner);
    let kinds = error_kinds(&typed);
    assert_eq!(kinds.len(), 1);
    let TypeErrorKind::NoSuchProperty { property, .. } = &kinds[0] else {
        panic!("expected NoSuchProperty, found {:?}", kinds[0]);
    };
    assert_eq!(interner.lookup(*property), "y");
}

// ── Declarations ────────────────────────────────────────────────────

#[test]
fn self_referential_struct_terminates() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            b.struct_def(
                "Node",
                None,
                vec![("value", b.ty("CInt")), ("next", b.ptr_ty(b.ty("Node")))],
            ),
            b.function(
                "second",
                None,
                vec![b.param("n", b.ty("Node"))],
                b.ty("CInt"),
                b.block(vec![b.ret(b.prop(b.load(b.prop(b.var("n"), "next")), "value"))]),
            ),
        ],
    );
    let typed = check(&program, &interner);
    assert_eq!(error_kinds(&typed), vec![]);
}

#[test]
fn mutually_recursive_functions_check() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            b.function(
                "ping",
                None,
                vec![],
                b.ty("CInt"),
                b.block(vec![b.ret(b.call(b.var("pong"), vec![]))]),
            ),
            b.function(
                "pong",
                None,
                vec![],
                b.ty("CInt"),
                b.block(vec![b.ret(b.call(b.var("ping"), vec![]))]),
            ),
        ],
    );
    let typed = check(&program, &interner);
    assert_eq!(error_kinds(&typed), vec![]);
    assert!(matches!(
        typed.expression_type(&match &expression(&program, 0, 0).kind {
            ExprKind::Call { callee, .. } => callee.location,
            _ => unreachable!(),
        }),
        Some(Type::RawPtr { .. })
    ));
}

#[test]
fn consts_must_be_scalar() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            b.const_def("answer", None, b.int(42)),
            b.const_def("limit", Some(b.ty("Size")), b.int(8)),
            b.const_def("greeting", None, b.byte_string(b"hi")),
        ],
    );
    let typed = check(&program, &interner);
    assert_eq!(error_kinds(&typed), vec![TypeErrorKind::NotAConst]);
}

#[test]
fn extern_functions_are_called_directly() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            b.extern_fn("puts", vec![b.ptr_ty(b.ty("Byte"))], b.ty("CInt"), "puts"),
            b.function(
                "main",
                None,
                vec![],
                b.ty("CInt"),
                b.block(vec![b.ret(b.call(b.var("puts"), vec![b.byte_string(b"hi")]))]),
            ),
        ],
    );
    let typed = check(&program, &interner);
    assert_eq!(error_kinds(&typed), vec![]);
}

#[test]
fn unbound_names_are_reported() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![b.function(
            "main",
            None,
            vec![b.param("p", b.ty("Missing"))],
            b.ty("CInt"),
            b.block(vec![b.ret(b.var("nowhere"))]),
        )],
    );
    let typed = check(&program, &interner);
    assert_eq!(
        error_kinds(&typed),
        vec![
            TypeErrorKind::UnboundType(interner.intern("Missing")),
            TypeErrorKind::UnboundVariable(interner.intern("nowhere")),
        ]
    );
}

#[test]
fn this_outside_an_extension_is_unbound() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![b.function(
            "main",
            None,
            vec![],
            b.ty("CInt"),
            b.block(vec![b.ret(b.this())]),
        )],
    );
    let typed = check(&program, &interner);

    assert_eq!(error_kinds(&typed), vec![TypeErrorKind::UnboundThis]);
    assert_eq!(
        typed.expression_type(expression(&program, 0, 0)),
        Some(&Type::Error)
    );
}

#[test]
#[should_panic(expected = "internal error: duplicate field")]
fn duplicate_fields_are_an_internal_error() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![b.struct_def(
            "Pair",
            None,
            vec![("x", b.ty("CInt")), ("x", b.ty("Bool"))],
        )],
    );
    check(&program, &interner);
}

// ── Memoization ─────────────────────────────────────────────────────

#[test]
fn queries_check_the_enclosing_declaration_once() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(
        &b,
        vec![
            add(&b),
            b.function(
                "main",
                None,
                vec![],
                b.ty("CInt"),
                b.block(vec![b.ret(b.call(b.var("add"), vec![b.int(1), b.bool_lit(false)]))]),
            ),
        ],
    );
    let resolver = ScopeResolver::new(&program);
    let mut checker = Checker::new(&resolver, &interner);

    let call = expression(&program, 1, 0);
    assert_eq!(checker.type_of_expression(call), Type::CInt);
    assert_eq!(checker.errors().len(), 1);

    // Neither the query nor a full pass re-checks `main`.
    assert_eq!(checker.type_of_expression(call), Type::CInt);
    checker.check_program(&program);
    assert_eq!(checker.errors().len(), 1);

    let return_type = &function(&program, 1).return_type;
    assert_eq!(checker.annotation_to_type(return_type), Type::CInt);
    let param_binder = function(&program, 0).params[0].binder;
    assert_eq!(checker.type_of_binder(&param_binder), Type::CInt);
}

#[test]
fn struct_queries_expose_members() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = program(&b, vec![point(&b)]);
    let resolver = ScopeResolver::new(&program);
    let mut checker = Checker::new(&resolver, &interner);

    let def = struct_def(&program, 0);
    let members = checker.type_of_struct_members(def);
    assert_eq!(members, vec![(interner.intern("x"), Type::CInt)]);
    let instance = checker.type_of_struct_instance(def);
    assert_eq!(instance.display(&interner).to_string(), "main.Point");
    assert!(checker.is_assignable_to(&instance, &instance));
    assert!(checker.is_type_equal(&instance, &instance));
}
