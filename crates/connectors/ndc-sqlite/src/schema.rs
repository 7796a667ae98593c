//! Implement the `/schema` endpoint to return the tables of the selected database.

use sqlx::SqlitePool;
use tracing::{info_span, Instrument};

use dc_api_types as api;
use ndc_sqlite_configuration::ConnectorConfig;
use query_engine_metadata::metadata;
use query_engine_metadata::metadata::introspection::{self, SchemaEntry, TableFilter};

use crate::error::ServerError;
use crate::state::State;

/// Get the connector's schema: every table of the selected database that the connector
/// config admits, with its columns and primary key.
pub async fn get_schema(
    state: &State,
    connector_config: &ConnectorConfig,
) -> Result<api::SchemaResponse, ServerError> {
    let pool = state.require_pool(connector_config.db.as_deref()).await?;
    let filter = TableFilter {
        tables: connector_config.tables.clone(),
        meta: connector_config.meta,
    };

    let tables = introspect(&pool, &filter)
        .instrument(info_span!("Introspect schema"))
        .await?;

    Ok(api::SchemaResponse {
        tables: tables.into_iter().map(table_info).collect(),
    })
}

async fn introspect(
    pool: &SqlitePool,
    filter: &TableFilter,
) -> Result<Vec<metadata::TableInfo>, ServerError> {
    let entries: Vec<SchemaEntry> = sqlx::query_as::<_, (String, Option<String>)>(
        "SELECT name, sql FROM sqlite_schema WHERE type = 'table' ORDER BY rowid",
    )
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(name, sql)| SchemaEntry { name, sql })
    .collect();

    Ok(introspection::introspect_tables(entries, filter)?)
}

fn table_info(table: metadata::TableInfo) -> api::TableInfo {
    api::TableInfo {
        name: table.name,
        primary_key: table.primary_key,
        description: table.description,
        columns: table
            .columns
            .into_iter()
            .map(|column| api::ColumnInfo {
                name: column.name,
                r#type: column.r#type.name().to_string(),
                nullable: column.nullable,
            })
            .collect(),
    }
}
