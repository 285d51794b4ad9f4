#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use hades_diagnostic::{DiagnosticConfig, ErrorCode};
use hades_hir::{
    HirBuilder, HirDefinition, HirFunction, HirFunctionSignature, HirParam, HirStatementKind,
    HirTypeParam,
};
use hades_ir::ast::builder::AstBuilder;
use hades_ir::{FileId, QualifiedName, SourceLocation, Span};
use hades_mono::{MonoConfig, MonoError, ValidationError};
use hades_types::Type;
use pretty_assertions::assert_eq;

fn loc(offset: u32) -> SourceLocation {
    SourceLocation::new(FileId::new(0), Span::new(offset, offset + 1))
}

fn main_name(interner: &StringInterner, name: &str) -> QualifiedName {
    QualifiedName::new(vec![interner.intern("main"), interner.intern(name)])
}

fn main_function(
    interner: &StringInterner,
    body: impl FnOnce(&mut HirBuilder<'_>),
) -> HirDefinition {
    let mut builder = HirBuilder::new(interner, loc(1));
    let body = builder.build_block(body);
    let signature = HirFunctionSignature {
        location: loc(0),
        name: main_name(interner, "main"),
        type_params: None,
        receiver_type: None,
        params: Vec::new(),
        return_type: Type::Void,
    };
    HirDefinition::Function(HirFunction {
        location: loc(0),
        signature,
        body,
    })
}

/// `fn identity[T](x: T): T { return x }`
fn identity(interner: &StringInterner) -> HirDefinition {
    let param = HirTypeParam {
        location: loc(40),
        name: interner.intern("T"),
    };
    let x = interner.intern("x");
    let mut builder = HirBuilder::new(interner, loc(41));
    let body = builder.build_block(|b| {
        let value = b.param_ref(x, param.param_ref());
        b.emit_return(value);
    });
    HirDefinition::Function(HirFunction {
        location: loc(40),
        signature: HirFunctionSignature {
            location: loc(40),
            name: main_name(interner, "identity"),
            type_params: Some(vec![param]),
            receiver_type: None,
            params: vec![HirParam {
                location: loc(42),
                name: x,
                ty: param.param_ref(),
            }],
            return_type: param.param_ref(),
        },
        body,
    })
}

#[test]
fn type_errors_are_reported_through_the_diagnostic_config() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = Program {
        files: vec![b.source_file(
            &["main"],
            vec![b.function(
                "main",
                None,
                vec![],
                b.ty("Void"),
                b.block(vec![
                    b.expr_stmt(b.var("missing")),
                    b.expr_stmt(b.var("absent")),
                    b.expr_stmt(b.var("gone")),
                ]),
            )],
        )],
    };
    let options = Options {
        diagnostics: DiagnosticConfig {
            error_limit: 2,
            ..DiagnosticConfig::default()
        },
        ..Options::default()
    };

    let Err(CompileError::TypeCheck(diagnostics)) =
        Session::new(&interner, options).check(&program)
    else {
        panic!("expected type errors");
    };
    assert_eq!(
        diagnostics.iter().map(|d| d.code).collect::<Vec<_>>(),
        vec![ErrorCode::E2003, ErrorCode::E2003]
    );
}

#[test]
fn well_typed_program_checks() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner, FileId::new(0));
    let program = Program {
        files: vec![b.source_file(
            &["main"],
            vec![b.function(
                "main",
                None,
                vec![],
                b.ty("CInt"),
                b.block(vec![b.ret(b.int(0))]),
            )],
        )],
    };

    let typed = Session::new(&interner, Options::default()).check(&program);
    assert!(typed.is_ok_and(|typed| !typed.has_errors()));
}

#[test]
fn specialization_limit_surfaces_as_a_compile_error() {
    let interner = StringInterner::new();
    let options = Options {
        mono: MonoConfig {
            max_specializations: 0,
        },
        ..Options::default()
    };
    let main = main_function(&interner, |b| {
        let callee = b.global_ref(main_name(b.interner(), "identity"), Type::Void);
        b.emit_call(Type::CInt, callee, vec![b.int_value(1)], Some(vec![Type::CInt]));
        b.emit_return(b.void_value());
    });
    let module: HirModule = [identity(&interner), main].into_iter().collect();

    let error = Session::new(&interner, options)
        .monomorphize(&module)
        .unwrap_err();

    let CompileError::Mono(MonoError::SpecializationLimit { limit, name, .. }) = &error else {
        panic!("expected the specialization limit, got {error:?}");
    };
    assert_eq!((*limit, name.as_str()), (0, "main.identity$[CInt]"));
    assert_eq!(error.diagnostics()[0].primary_location(), Some(loc(40)));
    assert_eq!(error.diagnostics()[0].code, ErrorCode::E3001);
}

#[test]
fn malformed_output_fails_validation() {
    let interner = StringInterner::new();
    let module: HirModule = [main_function(&interner, |b| {
        let ptr = b.global_ref(main_name(b.interner(), "table"), Type::ptr(Type::CInt));
        b.emit(HirStatementKind::Store {
            ptr,
            value: b.int_value(0),
        });
    })]
    .into_iter()
    .collect();

    let error = Session::new(&interner, Options::default())
        .monomorphize(&module)
        .unwrap_err();

    assert_eq!(
        error,
        CompileError::Validation(vec![ValidationError::StoreThroughImmutablePointer {
            ty: "*CInt".to_owned(),
            location: loc(1),
        }])
    );
    assert_eq!(error.diagnostics()[0].code, ErrorCode::E9001);
}
