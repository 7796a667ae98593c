use std::fs;
use std::path::PathBuf;

use ndc_sqlite_configuration::environment::FixedEnvironment;
use ndc_sqlite_configuration::QuerySettings;
use query_engine_sql::sql;
use query_engine_translation::translation;

/// Translate `tests/goldenfiles/<testname>/request.json` and return the SQL with its
/// parameters. A `configuration.json` next to the request supplies the query settings.
pub async fn test_translation(testname: &str) -> anyhow::Result<sql::string::SQL> {
    let directory = PathBuf::from("tests/goldenfiles").join(testname);
    let settings = read_query_settings(&directory).await?;

    let request = serde_json::from_str(&fs::read_to_string(directory.join("request.json"))?)?;

    let plan = translation::query::translate(&settings, request)?;
    Ok(plan.query.query_sql())
}

/// Translate a request with the given settings and return the compile error.
pub fn translation_error(
    settings: &QuerySettings,
    request: serde_json::Value,
) -> translation::error::Error {
    let request = serde_json::from_value(request).unwrap();
    translation::query::translate(settings, request).unwrap_err()
}

async fn read_query_settings(directory: &std::path::Path) -> anyhow::Result<QuerySettings> {
    if !directory.join("configuration.json").exists() {
        return Ok(QuerySettings::default());
    }
    let parsed_configuration = ndc_sqlite_configuration::parse_configuration(directory).await?;
    let configuration = ndc_sqlite_configuration::make_runtime_configuration(
        parsed_configuration,
        FixedEnvironment::default(),
    )?;
    Ok(configuration.query_settings)
}

/// Translate a request with the given settings and return the SQL.
pub fn translate_json(settings: &QuerySettings, request: serde_json::Value) -> sql::string::SQL {
    let request = serde_json::from_value(request).unwrap();
    translation::query::translate(settings, request)
        .unwrap()
        .query
        .query_sql()
}
