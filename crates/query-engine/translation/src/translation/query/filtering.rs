//! Handle filtering/where clauses translation.

use dc_api_types::{ComparisonColumn, ComparisonValue, Expression};
use query_engine_sql::sql;

use super::operators;
use super::relationships;
use super::values;
use crate::translation::error::Error;
use crate::translation::helpers::{Env, State, TableNameAndReference};

/// Translate a boolean expression over the rows of `table` to a SQL predicate.
pub fn translate_expression(
    env: &Env,
    state: &mut State,
    table: &TableNameAndReference,
    predicate: &Expression,
) -> Result<sql::ast::Expression, Error> {
    match predicate {
        Expression::And { expressions } => {
            expressions
                .iter()
                .try_fold(sql::helpers::true_expr(), |conjunction, expression| {
                    let expression = translate_expression(env, state, table, expression)?;
                    Ok::<_, Error>(sql::helpers::and(conjunction, expression))
                })
        }
        // An empty disjunction is false, not absent.
        Expression::Or { expressions } => expressions
            .iter()
            .try_fold(None, |disjunction, expression| {
                let expression = translate_expression(env, state, table, expression)?;
                Ok::<_, Error>(Some(match disjunction {
                    None => expression,
                    Some(left) => sql::ast::Expression::Or {
                        left: Box::new(left),
                        right: Box::new(expression),
                    },
                }))
            })
            .map(|disjunction| disjunction.unwrap_or_else(sql::helpers::false_expr)),
        Expression::Not { expression } => Ok(sql::ast::Expression::Not(Box::new(
            translate_expression(env, state, table, expression)?,
        ))),
        Expression::UnaryOp { operator, column } => {
            let operator = operators::translate_unary_operator(operator, &column.name)?;
            let mut scope = PathScope::new();
            let expression = translate_comparison_column(env, state, table, column, &mut scope)?;
            Ok(scope.into_predicate(
                env,
                sql::ast::Expression::UnaryOperation {
                    expression: Box::new(expression),
                    operator,
                },
            ))
        }
        Expression::BinaryOp {
            operator,
            column,
            value,
        } => {
            let operator = operators::translate_binary_operator(operator, &column.name)?;
            let mut scope = PathScope::new();
            let left = translate_comparison_column(env, state, table, column, &mut scope)?;
            let right =
                translate_comparison_value(env, state, table, &column.name, value, &mut scope)?;
            Ok(scope.into_predicate(
                env,
                sql::ast::Expression::BinaryOperation {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                },
            ))
        }
        Expression::BinaryArrOp {
            operator,
            column,
            values,
        } => {
            let operator = operators::translate_binary_array_operator(operator, &column.name)?;
            let mut scope = PathScope::new();
            let left = translate_comparison_column(env, state, table, column, &mut scope)?;
            let right = values
                .iter()
                .map(|value| {
                    let value = values::translate_json_value(&column.name, value)?;
                    Ok(env.tag("bop_val", sql::ast::Expression::Value(value)))
                })
                .collect::<Result<Vec<_>, Error>>()?;

            // `x IN ()` is not valid SQLite.
            let comparison = if right.is_empty() {
                sql::helpers::false_expr()
            } else {
                sql::ast::Expression::BinaryArrayOperation {
                    left: Box::new(left),
                    operator,
                    right,
                }
            };
            Ok(scope.into_predicate(env, comparison))
        }
    }
}

/// The tables a comparison reaches through relationship paths, and the conditions joining
/// them to the table being filtered.
struct PathScope {
    tables: Vec<(String, sql::ast::TableAlias)>,
    conditions: sql::ast::Expression,
}

impl PathScope {
    fn new() -> PathScope {
        PathScope {
            tables: vec![],
            conditions: sql::helpers::true_expr(),
        }
    }

    /// Wrap a comparison in `EXISTS (SELECT 1 FROM ... WHERE <joins> AND <comparison>)`
    /// when it reaches other tables. A comparison on the filtered table is returned as is.
    fn into_predicate(self, env: &Env, comparison: sql::ast::Expression) -> sql::ast::Expression {
        let PathScope { tables, conditions } = self;
        let mut tables = tables.into_iter().map(|(name, alias)| {
            (
                sql::ast::TableReference::DBTable(sql::ast::TableName(name)),
                alias,
            )
        });

        match tables.next() {
            None => comparison,
            Some((reference, alias)) => {
                let joins = tables
                    .map(|(reference, alias)| {
                        sql::ast::Join::CrossJoin(sql::ast::CrossJoin { reference, alias })
                    })
                    .collect();
                let select = sql::helpers::select_one(
                    sql::ast::From::Table { reference, alias },
                    joins,
                    sql::helpers::and(conditions, comparison),
                );
                env.tag(
                    "exists",
                    sql::ast::Expression::Exists {
                        select: Box::new(select),
                    },
                )
            }
        }
    }
}

/// Resolve a column, walking its relationship path from `table`. Every traversed table is
/// added to `scope` under a fresh alias.
fn translate_comparison_column(
    env: &Env,
    state: &mut State,
    table: &TableNameAndReference,
    column: &ComparisonColumn,
    scope: &mut PathScope,
) -> Result<sql::ast::Expression, Error> {
    let limit = env.settings().max_path_length;
    if column.path.len() > limit as usize {
        return Err(Error::PathTooLong {
            column: column.name.clone(),
            length: column.path.len(),
            limit,
        });
    }

    let mut current = table.clone();
    for relationship_name in &column.path {
        let relationship = env.lookup_relationship(&current.name, relationship_name)?;
        let alias = state.make_table_alias(relationship.target_table.clone());
        let target =
            TableNameAndReference::aliased(relationship.target_table.clone(), alias.clone());

        let join = relationships::translate_column_mapping(
            &current,
            &target,
            relationship_name,
            relationship,
        )?;
        let conditions = std::mem::replace(&mut scope.conditions, sql::helpers::true_expr());
        scope.conditions = sql::helpers::and(conditions, join);
        scope.tables.push((relationship.target_table.clone(), alias));

        current = target;
    }

    Ok(env.tag("bop_col", current.column(&column.name)))
}

fn translate_comparison_value(
    env: &Env,
    state: &mut State,
    table: &TableNameAndReference,
    compared_column: &str,
    value: &ComparisonValue,
    scope: &mut PathScope,
) -> Result<sql::ast::Expression, Error> {
    let expression = match value {
        ComparisonValue::Column { column } => {
            translate_comparison_column(env, state, table, column, scope)?
        }
        ComparisonValue::Scalar { value } => {
            sql::ast::Expression::Value(values::translate_json_value(compared_column, value)?)
        }
    };
    Ok(env.tag("bop_val", expression))
}
