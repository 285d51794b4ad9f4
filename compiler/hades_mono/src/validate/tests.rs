use super::*;
use hades_hir::{
    HirBuilder, HirExpression, HirFunction, HirFunctionSignature, HirStruct, HirTypeParam,
};
use hades_ir::{FileId, Span};
use pretty_assertions::assert_eq;

fn loc(offset: u32) -> SourceLocation {
    SourceLocation::new(FileId::new(0), Span::new(offset, offset + 1))
}

fn main_name(interner: &StringInterner, name: &str) -> QualifiedName {
    QualifiedName::new(vec![interner.intern("main"), interner.intern(name)])
}

fn concrete_function(
    interner: &StringInterner,
    body: impl FnOnce(&mut HirBuilder<'_>),
) -> HirDefinition {
    let mut builder = HirBuilder::new(interner, loc(50));
    let body = builder.build_block(body);
    HirDefinition::Function(HirFunction {
        location: loc(0),
        signature: HirFunctionSignature {
            location: loc(0),
            name: main_name(interner, "main"),
            type_params: None,
            receiver_type: None,
            params: Vec::new(),
            return_type: Type::Void,
        },
        body,
    })
}

fn pair(interner: &StringInterner) -> HirDefinition {
    HirDefinition::Struct(HirStruct {
        location: loc(10),
        name: main_name(interner, "Pair"),
        type_params: None,
        fields: vec![
            (interner.intern("left"), Type::CInt),
            (interner.intern("right"), Type::Bool),
        ],
    })
}

fn pair_type(interner: &StringInterner) -> Type {
    Type::Constructor(hades_types::Constructor {
        binder: None,
        name: main_name(interner, "Pair"),
        params: None,
    })
}

#[test]
fn concrete_module_is_clean() {
    let interner = StringInterner::new();
    let right = interner.intern("right");
    let module: HirModule = [
        pair(&interner),
        concrete_function(&interner, |b| {
            let slot = b.emit_alloca("p", pair_type(b.interner()));
            let field = b.field_ptr(slot, right, 1, Type::mut_ptr(Type::Bool));
            b.emit_store(field, b.true_value());
            b.emit_return(b.void_value());
        }),
    ]
    .into_iter()
    .collect();

    assert_eq!(validate(&module, &interner), Vec::new());
}

#[test]
fn generic_residue_is_reported() {
    let interner = StringInterner::new();
    let param = HirTypeParam {
        location: loc(20),
        name: interner.intern("T"),
    };
    let generic = HirDefinition::Struct(HirStruct {
        location: loc(20),
        name: main_name(&interner, "Box"),
        type_params: Some(vec![param]),
        fields: vec![(interner.intern("value"), param.param_ref())],
    });
    let module: HirModule = [
        generic,
        concrete_function(&interner, |b| {
            b.location = loc(60);
            b.emit_alloca("t", param.param_ref());
            b.location = loc(61);
            let callee = b.global_ref(main_name(b.interner(), "f"), Type::Void);
            b.emit(HirStatementKind::TypeApplication {
                name: b.make_name("inst"),
                ty: Type::Void,
                expression: callee,
                args: vec![Type::CInt],
            });
        }),
    ]
    .into_iter()
    .collect();

    let errors = validate(&module, &interner);

    assert_eq!(
        errors,
        vec![
            ValidationError::GenericDefinition {
                name: "main.Box".to_owned(),
                location: loc(20),
            },
            ValidationError::NonConcreteType {
                ty: "T".to_owned(),
                location: loc(60),
            },
            ValidationError::UnresolvedTypeApplication { location: loc(61) },
        ]
    );
    assert_eq!(errors[0].to_diagnostic().code, ErrorCode::E9001);
}

#[test]
fn leftover_type_arguments_and_bad_stores_are_reported() {
    let interner = StringInterner::new();
    let module: HirModule = [concrete_function(&interner, |b| {
        b.location = loc(70);
        let callee = b.global_ref(main_name(b.interner(), "f"), Type::Void);
        b.emit_call(Type::Void, callee, Vec::new(), Some(vec![Type::CInt]));
        b.location = loc(71);
        let table = b.global_ref(main_name(b.interner(), "table"), Type::ptr(Type::CInt));
        b.emit(HirStatementKind::Store {
            ptr: table,
            value: b.int_value(0),
        });
    })]
    .into_iter()
    .collect();

    assert_eq!(
        validate(&module, &interner),
        vec![
            ValidationError::CallWithTypeArgs { location: loc(70) },
            ValidationError::StoreThroughImmutablePointer {
                ty: "*CInt".to_owned(),
                location: loc(71),
            },
        ]
    );
}

#[test]
fn field_index_must_match_the_struct() {
    let interner = StringInterner::new();
    let left = interner.intern("left");
    let module: HirModule = [
        pair(&interner),
        concrete_function(&interner, |b| {
            b.location = loc(80);
            let name = b.make_name("v");
            let value = HirExpression::local_ref(b.location, pair_type(b.interner()), name);
            b.get_struct_field(value, left, 1, Type::CInt);
        }),
    ]
    .into_iter()
    .collect();

    assert_eq!(
        validate(&module, &interner),
        vec![ValidationError::FieldIndexMismatch {
            struct_name: "main.Pair".to_owned(),
            field: "left".to_owned(),
            index: 1,
            location: loc(80),
        }]
    );
}
