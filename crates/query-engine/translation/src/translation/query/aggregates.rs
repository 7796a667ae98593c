//! Handle aggregates translation.

use indexmap::IndexMap;

use dc_api_types::{Aggregate, FieldName, SingleColumnAggregateFunction};
use query_engine_sql::sql;

use crate::translation::error::Error;
use crate::translation::helpers::TableNameAndReference;

/// Translate the aggregates of a query into a JSON object whose keys are the aggregate names.
/// `table` is the already filtered and paginated row set.
pub fn translate(
    table: &TableNameAndReference,
    aggregates: &IndexMap<FieldName, Aggregate>,
) -> Result<sql::ast::Expression, Error> {
    aggregates
        .iter()
        .map(|(alias, aggregate)| {
            let expression = match aggregate {
                Aggregate::StarCount => sql::ast::Expression::Count(sql::ast::CountType::Star),
                Aggregate::ColumnCount { column, distinct } => {
                    let column = sql::ast::ColumnReference::TableColumn {
                        table: table.reference.clone(),
                        name: sql::ast::ColumnName(column.clone()),
                    };
                    if *distinct {
                        sql::ast::Expression::Count(sql::ast::CountType::Distinct(column))
                    } else {
                        sql::ast::Expression::Count(sql::ast::CountType::Simple(column))
                    }
                }
                Aggregate::SingleColumn { column, function } => sql::helpers::call(
                    translate_function(function, column)?,
                    vec![table.column(column)],
                ),
            };
            Ok((alias.clone(), expression))
        })
        .collect::<Result<IndexMap<_, _>, Error>>()
        .map(sql::ast::Expression::JsonObject)
}

fn translate_function(
    function: &SingleColumnAggregateFunction,
    column: &str,
) -> Result<sql::ast::Function, Error> {
    match function.0.as_str() {
        "avg" => Ok(sql::ast::Function::Avg),
        "sum" => Ok(sql::ast::Function::Sum),
        "min" => Ok(sql::ast::Function::Min),
        "max" => Ok(sql::ast::Function::Max),
        _ => Err(Error::UnsupportedAggregateFunction {
            function: function.to_string(),
            column: column.to_string(),
        }),
    }
}
