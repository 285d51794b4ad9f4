use hades_ir::ast::BinaryOperator;

use crate::Type;

/// Operand and result types for a non-equality binary operator.
///
/// Keyed on the operator and the left operand's type; returns the type the
/// right operand is checked against and the type of the whole expression.
pub(crate) fn binary_operator_rule(operator: BinaryOperator, lhs: &Type) -> Option<(Type, Type)> {
    use BinaryOperator as Op;

    match (operator, lhs) {
        (Op::Plus | Op::Minus | Op::Times, Type::CInt) => Some((Type::CInt, Type::CInt)),
        (
            Op::GreaterThan | Op::GreaterThanEqual | Op::LessThan | Op::LessThanEqual,
            Type::CInt,
        ) => Some((Type::CInt, Type::Bool)),
        (Op::Plus | Op::Minus | Op::Times, Type::Size) => Some((Type::Size, Type::Size)),
        (
            Op::GreaterThan | Op::GreaterThanEqual | Op::LessThan | Op::LessThanEqual,
            Type::Size,
        ) => Some((Type::Size, Type::Bool)),
        (Op::And | Op::Or, Type::Bool) => Some((Type::Bool, Type::Bool)),
        _ => None,
    }
}
