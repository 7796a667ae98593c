use std::time::Duration;

use ndc_sqlite_configuration::QuerySettings;
use query_engine_execution::error as execution_error;
use query_engine_execution::query;
use query_engine_translation::translation;
use tests_common::fixtures::FixtureDatabase;

/// Compile a request with the default settings, run it against the fixture and return the
/// response as JSON.
pub async fn run_query(
    database: &FixtureDatabase,
    request: serde_json::Value,
) -> anyhow::Result<serde_json::Value> {
    let pool = database.pool().await?;
    Ok(run_query_on(&pool, request, Some(Duration::from_secs(10))).await??)
}

/// Compile a request with the default settings and run it on the given pool.
pub async fn run_query_on(
    pool: &sqlx::SqlitePool,
    request: serde_json::Value,
    timeout: Option<Duration>,
) -> anyhow::Result<Result<serde_json::Value, execution_error::Error>> {
    let plan = translation::query::translate(
        &QuerySettings::default(),
        serde_json::from_value(request)?,
    )?;
    Ok(match query::execute(pool, &plan, timeout).await {
        Ok(response) => Ok(serde_json::to_value(response)?),
        Err(err) => Err(err),
    })
}

/// Compile a request and explain it against the fixture.
pub async fn run_explain(
    database: &FixtureDatabase,
    request: serde_json::Value,
) -> anyhow::Result<(String, Vec<String>)> {
    let pool = database.pool().await?;
    let plan = translation::query::translate(
        &QuerySettings::default(),
        serde_json::from_value(request)?,
    )?;
    Ok(query::explain(&pool, &plan, None).await?)
}

/// The relationships between the fixture tables.
pub fn chinook_relationships() -> serde_json::Value {
    serde_json::json!([
        {
            "source_table": "Artist",
            "relationships": {
                "Albums": {
                    "target_table": "Album",
                    "relationship_type": "array",
                    "column_mapping": { "ArtistId": "ArtistId" }
                }
            }
        },
        {
            "source_table": "Album",
            "relationships": {
                "Artist": {
                    "target_table": "Artist",
                    "relationship_type": "object",
                    "column_mapping": { "ArtistId": "ArtistId" }
                },
                "Tracks": {
                    "target_table": "Track",
                    "relationship_type": "array",
                    "column_mapping": { "AlbumId": "AlbumId" }
                }
            }
        },
        {
            "source_table": "Track",
            "relationships": {
                "Album": {
                    "target_table": "Album",
                    "relationship_type": "object",
                    "column_mapping": { "AlbumId": "AlbumId" }
                }
            }
        }
    ])
}
