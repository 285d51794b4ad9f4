//! Checks that a module is ready for code generation.
//!
//! Run after monomorphization. Anything reported here is a defect in an
//! earlier pass, so the errors map to [`ErrorCode::E9001`].

use hades_diagnostic::{Diagnostic, ErrorCode};
use hades_hir::{HirDefinition, HirModule, HirStatement, HirStatementKind, HirVisitor};
use hades_ir::{Name, QualifiedName, SourceLocation, StringInterner};
use hades_types::{walk_type, Type, TypeVisitor};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("generic definition `{name}` survived monomorphization")]
    GenericDefinition {
        name: String,
        location: SourceLocation,
    },
    #[error("type `{ty}` is not concrete")]
    NonConcreteType { ty: String, location: SourceLocation },
    #[error("unresolved type application")]
    UnresolvedTypeApplication { location: SourceLocation },
    #[error("call still carries type arguments")]
    CallWithTypeArgs { location: SourceLocation },
    #[error("store through `{ty}`, which is not a mutable pointer")]
    StoreThroughImmutablePointer { ty: String, location: SourceLocation },
    #[error("field `{field}` is not at index {index} of `{struct_name}`")]
    FieldIndexMismatch {
        struct_name: String,
        field: String,
        index: usize,
        location: SourceLocation,
    },
}

impl ValidationError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ValidationError::GenericDefinition { location, .. }
            | ValidationError::NonConcreteType { location, .. }
            | ValidationError::UnresolvedTypeApplication { location }
            | ValidationError::CallWithTypeArgs { location }
            | ValidationError::StoreThroughImmutablePointer { location, .. }
            | ValidationError::FieldIndexMismatch { location, .. } => *location,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(ErrorCode::E9001)
            .with_message(self.to_string())
            .with_label(self.location(), "in this node")
    }
}

/// Every problem in `module`, in traversal order.
pub fn validate(module: &HirModule, interner: &StringInterner) -> Vec<ValidationError> {
    let mut validator = Validator {
        module,
        interner,
        errors: Vec::new(),
    };
    validator.visit_module(module);
    validator.errors
}

struct Validator<'a> {
    module: &'a HirModule,
    interner: &'a StringInterner,
    errors: Vec<ValidationError>,
}

impl Validator<'_> {
    fn check_field(
        &mut self,
        lhs_struct: &Type,
        field: Name,
        index: usize,
        location: SourceLocation,
    ) {
        let name = match lhs_struct {
            Type::Struct(s) => &s.constructor.name,
            Type::Constructor(c) => &c.name,
            _ => return,
        };
        let Some(HirDefinition::Struct(def)) = self.module.find_global_definition(name) else {
            return;
        };
        if def.field_index(field) != Some(index) {
            let struct_name = self.display_name(name);
            self.errors.push(ValidationError::FieldIndexMismatch {
                struct_name,
                field: self.interner.lookup(field).to_owned(),
                index,
                location,
            });
        }
    }

    fn display_name(&self, name: &QualifiedName) -> String {
        name.display(self.interner).to_string()
    }
}

impl HirVisitor for Validator<'_> {
    fn visit_definition(&mut self, definition: &HirDefinition) {
        if definition.is_generic() {
            let name = self.display_name(definition.name());
            self.errors.push(ValidationError::GenericDefinition {
                name,
                location: definition.location(),
            });
            return;
        }
        self.super_visit_definition(definition);
    }

    fn visit_statement(&mut self, statement: &HirStatement) {
        let location = statement.location;
        match &statement.kind {
            HirStatementKind::TypeApplication { .. } => {
                self.errors.push(ValidationError::UnresolvedTypeApplication { location });
            }
            HirStatementKind::Call {
                type_args: Some(_), ..
            } => {
                self.errors.push(ValidationError::CallWithTypeArgs { location });
            }
            HirStatementKind::Store { ptr, .. } if !ptr.ty.is_mutable_ptr() => {
                self.errors.push(ValidationError::StoreThroughImmutablePointer {
                    ty: ptr.ty.display(self.interner).to_string(),
                    location,
                });
            }
            HirStatementKind::GetStructField {
                lhs, field, index, ..
            } => self.check_field(&lhs.ty, *field, *index, location),
            HirStatementKind::GetStructFieldPointer {
                lhs, field, index, ..
            } => {
                if let Some(pointee) = lhs.ty.pointee() {
                    self.check_field(pointee, *field, *index, location);
                }
            }
            _ => {}
        }
        self.super_visit_statement(statement);
    }

    fn visit_type(&mut self, ty: &Type, location: SourceLocation) {
        let mut residue = GenericResidue::default();
        residue.visit(ty);
        if residue.found {
            self.errors.push(ValidationError::NonConcreteType {
                ty: ty.display(self.interner).to_string(),
                location,
            });
        }
    }
}

/// Finds type parameters, inference variables, unlowered applications and
/// generic function types.
#[derive(Default)]
struct GenericResidue {
    found: bool,
}

impl TypeVisitor for GenericResidue {
    fn visit(&mut self, ty: &Type) {
        match ty {
            Type::ParamRef(_) | Type::GenericInstance(_) | Type::Application { .. } => {
                self.found = true;
            }
            Type::Function(function) if function.type_params.is_some() => self.found = true,
            _ => walk_type(self, ty),
        }
    }
}

#[cfg(test)]
mod tests;
