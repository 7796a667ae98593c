//! Map the comparison operators of a request to SQL operators.

use dc_api_types::{
    BinaryArrayComparisonOperator, BinaryComparisonOperator, UnaryComparisonOperator,
};
use query_engine_sql::sql;

use crate::translation::error::Error;

pub fn translate_binary_operator(
    operator: &BinaryComparisonOperator,
    column: &str,
) -> Result<sql::ast::BinaryOperator, Error> {
    match operator.0.as_str() {
        "equal" => Ok(sql::ast::BinaryOperator::Equals),
        "greater_than" => Ok(sql::ast::BinaryOperator::GreaterThan),
        "greater_than_or_equal" => Ok(sql::ast::BinaryOperator::GreaterThanOrEqualTo),
        "less_than" => Ok(sql::ast::BinaryOperator::LessThan),
        "less_than_or_equal" => Ok(sql::ast::BinaryOperator::LessThanOrEqualTo),
        _ => Err(unsupported(operator, column)),
    }
}

pub fn translate_binary_array_operator(
    operator: &BinaryArrayComparisonOperator,
    column: &str,
) -> Result<sql::ast::BinaryArrayOperator, Error> {
    match operator.0.as_str() {
        "in" => Ok(sql::ast::BinaryArrayOperator::In),
        _ => Err(unsupported(operator, column)),
    }
}

pub fn translate_unary_operator(
    operator: &UnaryComparisonOperator,
    column: &str,
) -> Result<sql::ast::UnaryOperator, Error> {
    match operator.0.as_str() {
        "is_null" => Ok(sql::ast::UnaryOperator::IsNull),
        _ => Err(unsupported(operator, column)),
    }
}

fn unsupported(operator: impl std::fmt::Display, column: &str) -> Error {
    Error::UnsupportedOperator {
        operator: operator.to_string(),
        column: column.to_string(),
    }
}
