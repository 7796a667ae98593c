//! Handle stuff related to relationships and joins.

use indexmap::IndexMap;

use dc_api_types::{Expression, Query, Relationship, RelationshipType};
use query_engine_sql::sql;

use super::fields;
use super::filtering;
use super::root;
use crate::translation::error::Error;
use crate::translation::helpers::{Env, State, TableNameAndReference};

/// How the rows of a relationship's target table relate to the parent row.
#[derive(Debug, Clone, Copy)]
pub struct Correlation<'a> {
    pub parent: &'a TableNameAndReference,
    pub relationship_name: &'a str,
    pub relationship: &'a Relationship,
}

/// Translate a relationship field of `parent` to a scalar sub-expression producing JSON.
pub fn translate_relationship_field(
    env: &Env,
    state: &mut State,
    depth: u32,
    parent: &TableNameAndReference,
    relationship_name: &str,
    query: &Query,
) -> Result<sql::ast::Expression, Error> {
    let limit = env.settings().max_relationship_depth;
    if depth > limit {
        return Err(Error::RelationshipDepthExceeded { limit });
    }

    let relationship = env.lookup_relationship(&parent.name, relationship_name)?;
    let correlation = Correlation {
        parent,
        relationship_name,
        relationship,
    };

    let expression = match relationship.relationship_type {
        RelationshipType::Object => {
            translate_object_relationship(env, state, depth, correlation, query)?
        }
        RelationshipType::Array => root::translate_array_query(
            env,
            state,
            depth,
            &relationship.target_table,
            Some(correlation),
            query,
        )?,
    };
    Ok(env.tag("relationship", expression))
}

/// An object relationship selects the related row as `{"rows": [row]}`, and null when there
/// is none.
fn translate_object_relationship(
    env: &Env,
    state: &mut State,
    depth: u32,
    correlation: Correlation,
    query: &Query,
) -> Result<sql::ast::Expression, Error> {
    if query.aggregates.is_some() {
        return Err(Error::UnsupportedAggregates {
            relationship: correlation.relationship_name.to_string(),
        });
    }

    let target_table = correlation.relationship.target_table.clone();
    let table_alias = state.make_table_alias(target_table.clone());
    let table = TableNameAndReference::aliased(target_table.clone(), table_alias.clone());

    let where_ = filter_rows(
        env,
        state,
        &table,
        Some(correlation),
        query.predicate.as_ref(),
    )?;
    let object = fields::translate_fields(env, state, depth, &table, query.fields.as_ref())?;

    let rows = sql::ast::Expression::JsonObject(IndexMap::from([(
        "rows".to_string(),
        sql::helpers::call(sql::ast::Function::JsonArray, vec![object]),
    )]));

    let mut select = sql::helpers::simple_select(vec![(
        sql::helpers::make_column_alias("object".to_string()),
        rows,
    )]);
    select.from = Some(sql::ast::From::Table {
        reference: sql::ast::TableReference::DBTable(sql::ast::TableName(target_table)),
        alias: table_alias,
    });
    select.where_ = root::where_clause(env, where_);

    Ok(env.tag(
        "object_relationship",
        sql::ast::Expression::CorrelatedSubSelect(Box::new(select)),
    ))
}

/// The predicate selecting the rows of `table`: the query's own filter, and the join to the
/// parent row when there is one.
pub fn filter_rows(
    env: &Env,
    state: &mut State,
    table: &TableNameAndReference,
    correlation: Option<Correlation>,
    predicate: Option<&Expression>,
) -> Result<sql::ast::Expression, Error> {
    let filter = match predicate {
        None => sql::helpers::true_expr(),
        Some(predicate) => filtering::translate_expression(env, state, table, predicate)?,
    };
    let join = match correlation {
        None => sql::helpers::true_expr(),
        Some(correlation) => translate_column_mapping(
            correlation.parent,
            table,
            correlation.relationship_name,
            correlation.relationship,
        )?,
    };
    Ok(sql::helpers::and(filter, join))
}

/// Given a relationship, turn its column mapping into the equi-join condition between
/// the source and target tables.
pub fn translate_column_mapping(
    source: &TableNameAndReference,
    target: &TableNameAndReference,
    relationship_name: &str,
    relationship: &Relationship,
) -> Result<sql::ast::Expression, Error> {
    if relationship.column_mapping.is_empty() {
        return Err(Error::EmptyColumnMapping {
            source_table: source.name.clone(),
            relationship: relationship_name.to_string(),
        });
    }

    Ok(relationship
        .column_mapping
        .iter()
        .map(
            |(source_column, target_column)| sql::ast::Expression::BinaryOperation {
                left: Box::new(source.column(source_column)),
                operator: sql::ast::BinaryOperator::Equals,
                right: Box::new(target.column(target_column)),
            },
        )
        .fold(sql::helpers::true_expr(), sql::helpers::and))
}
