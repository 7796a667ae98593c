//! Handle 'rows' translation: build the JSON object for each row.

use indexmap::IndexMap;

use dc_api_types::{Field, FieldName};
use query_engine_sql::sql;

use super::relationships;
use crate::translation::error::Error;
use crate::translation::helpers::{Env, State, TableNameAndReference};

/// Translate the field selection of a query over `table` into a `JSON_OBJECT(...)` call whose
/// keys follow the order of the request.
pub fn translate_fields(
    env: &Env,
    state: &mut State,
    depth: u32,
    table: &TableNameAndReference,
    fields: Option<&IndexMap<FieldName, Field>>,
) -> Result<sql::ast::Expression, Error> {
    let object = fields
        .into_iter()
        .flatten()
        .map(|(key, field)| {
            let value = match field {
                Field::Column { column } => table.column(column),
                // the relationship's JSON text has to be parsed again to nest as JSON
                Field::Relationship {
                    relationship,
                    query,
                } => sql::helpers::json(relationships::translate_relationship_field(
                    env,
                    state,
                    depth + 1,
                    table,
                    relationship,
                    query,
                )?),
            };
            Ok((key.clone(), value))
        })
        .collect::<Result<IndexMap<_, _>, Error>>()?;

    Ok(env.tag("json_object", sql::ast::Expression::JsonObject(object)))
}
