//! Handle the translation of array queries: the root of a request and every array
//! relationship.

use indexmap::IndexMap;

use dc_api_types::{Aggregate, FieldName, Query};
use query_engine_sql::sql;

use super::aggregates;
use super::fields;
use super::relationships::{self, Correlation};
use super::sorting;
use crate::translation::error::Error;
use crate::translation::helpers::{Env, State, TableNameAndReference};

/// Translate a query over `table_name` into an expression producing its JSON result: an array
/// of row objects, or `{"aggregates": {...}, "rows": [...]}` when the query has aggregates.
/// `correlation` restricts the rows to those related to a parent row.
pub fn translate_array_query(
    env: &Env,
    state: &mut State,
    depth: u32,
    table_name: &str,
    correlation: Option<Correlation>,
    query: &Query,
) -> Result<sql::ast::Expression, Error> {
    match &query.aggregates {
        None => translate_rows(env, state, depth, table_name, correlation, query),
        Some(aggregates) => {
            let mut row_set = IndexMap::new();

            let aggregates_select =
                translate_aggregates(env, state, table_name, correlation, query, aggregates)?;
            row_set.insert(
                "aggregates".to_string(),
                sql::helpers::json(sql::ast::Expression::CorrelatedSubSelect(Box::new(
                    aggregates_select,
                ))),
            );

            if query.fields.is_some() {
                let rows = translate_rows(env, state, depth, table_name, correlation, query)?;
                row_set.insert("rows".to_string(), sql::helpers::json(rows));
            }

            Ok(sql::ast::Expression::JsonObject(row_set))
        }
    }
}

/// Build the rows of an array query:
///
/// ```sql
/// (SELECT JSON_GROUP_ARRAY(JSON("rows"."j")) FROM (
///     SELECT JSON_OBJECT(...) AS "j" FROM "table" WHERE ... LIMIT ... OFFSET ...
/// ) AS "rows")
/// ```
///
/// When the query is ordered, the filtered, ordered and paginated rows are selected first and
/// the objects are built over that sub-select. Building the objects in the same SELECT as the
/// ORDER BY makes SQLite aggregate them as strings rather than JSON.
fn translate_rows(
    env: &Env,
    state: &mut State,
    depth: u32,
    table_name: &str,
    correlation: Option<Correlation>,
    query: &Query,
) -> Result<sql::ast::Expression, Error> {
    let table_alias = state.make_table_alias(table_name.to_string());
    let table = TableNameAndReference::aliased(table_name.to_string(), table_alias.clone());
    let from_table = sql::ast::From::Table {
        reference: sql::ast::TableReference::DBTable(sql::ast::TableName(table_name.to_string())),
        alias: table_alias,
    };

    let where_ = relationships::filter_rows(
        env,
        state,
        &table,
        correlation,
        query.predicate.as_ref(),
    )?;
    let limit = translate_limit(query);
    let order_by = query.order_by.as_deref().unwrap_or_default();

    let object_alias = sql::helpers::make_column_alias("j".to_string());

    let objects = if order_by.is_empty() {
        let object = fields::translate_fields(env, state, depth, &table, query.fields.as_ref())?;
        let mut select = sql::helpers::simple_select(vec![(object_alias.clone(), object)]);
        select.from = Some(from_table);
        select.where_ = where_clause(env, where_);
        select.limit = limit;
        select
    } else {
        let mut ordered = sql::helpers::star_select(from_table);
        ordered.where_ = where_clause(env, where_);
        ordered.order_by = sorting::translate_order_by(&table, order_by);
        ordered.limit = limit;

        let ordered_alias = state.make_table_alias(table_name.to_string());
        let ordered_table =
            TableNameAndReference::aliased(table_name.to_string(), ordered_alias.clone());
        let object =
            fields::translate_fields(env, state, depth, &ordered_table, query.fields.as_ref())?;

        let mut select = sql::helpers::simple_select(vec![(object_alias.clone(), object)]);
        select.from = Some(sql::ast::From::Select {
            select: Box::new(ordered),
            alias: ordered_alias,
        });
        select
    };

    let rows_alias = state.make_table_alias("rows".to_string());
    let item = sql::helpers::json(sql::ast::Expression::ColumnReference(
        sql::ast::ColumnReference::AliasedColumn {
            table: sql::ast::TableReference::AliasedTable(rows_alias.clone()),
            column: object_alias,
        },
    ));

    let mut select = sql::helpers::simple_select(vec![(
        sql::helpers::make_column_alias("array".to_string()),
        sql::helpers::call(sql::ast::Function::JsonGroupArray, vec![item]),
    )]);
    select.from = Some(sql::ast::From::Select {
        select: Box::new(objects),
        alias: rows_alias,
    });

    Ok(env.tag(
        "array_relationship",
        sql::ast::Expression::CorrelatedSubSelect(Box::new(select)),
    ))
}

/// Build the aggregates of an array query over the same filtered, ordered and paginated rows
/// as `translate_rows`.
fn translate_aggregates(
    env: &Env,
    state: &mut State,
    table_name: &str,
    correlation: Option<Correlation>,
    query: &Query,
    aggregates: &IndexMap<FieldName, Aggregate>,
) -> Result<sql::ast::Select, Error> {
    let table_alias = state.make_table_alias(table_name.to_string());
    let table = TableNameAndReference::aliased(table_name.to_string(), table_alias.clone());

    let where_ = relationships::filter_rows(
        env,
        state,
        &table,
        correlation,
        query.predicate.as_ref(),
    )?;

    let mut row_set = sql::helpers::star_select(sql::ast::From::Table {
        reference: sql::ast::TableReference::DBTable(sql::ast::TableName(table_name.to_string())),
        alias: table_alias,
    });
    row_set.where_ = where_clause(env, where_);
    row_set.order_by =
        sorting::translate_order_by(&table, query.order_by.as_deref().unwrap_or_default());
    row_set.limit = translate_limit(query);

    let row_set_alias = state.make_table_alias(table_name.to_string());
    let row_set_table =
        TableNameAndReference::aliased(table_name.to_string(), row_set_alias.clone());
    let object = aggregates::translate(&row_set_table, aggregates)?;

    let mut select = sql::helpers::simple_select(vec![(
        sql::helpers::make_column_alias("aggregates".to_string()),
        env.tag("aggregates", object),
    )]);
    select.from = Some(sql::ast::From::Select {
        select: Box::new(row_set),
        alias: row_set_alias,
    });
    Ok(select)
}

fn translate_limit(query: &Query) -> sql::ast::Limit {
    sql::ast::Limit {
        limit: query.limit,
        offset: query.offset,
    }
}

/// A WHERE clause, tagged unless it is empty.
pub(crate) fn where_clause(env: &Env, expression: sql::ast::Expression) -> sql::ast::Where {
    if expression == sql::helpers::true_expr() {
        sql::ast::Where(expression)
    } else {
        sql::ast::Where(env.tag("where", expression))
    }
}
