//! Convert the parsed configuration metadata to internal engine metadata
//! That can be used by the connector at runtime.

use std::path::PathBuf;

use crate::configuration::{Configuration, DatabaseConnectionSettings};
use crate::environment::Environment;
use crate::error::MakeRuntimeConfigurationError;
use crate::version1::ParsedConfiguration;

/// Convert the parsed configuration into the runtime configuration, resolving secrets
/// against the environment.
pub fn make_runtime_configuration(
    parsed_config: ParsedConfiguration,
    environment: impl Environment,
) -> Result<Configuration, MakeRuntimeConfigurationError> {
    let databases = parsed_config
        .databases
        .into_iter()
        .map(|(name, settings)| {
            let path = settings.path.resolve(&environment).map_err(|source| {
                MakeRuntimeConfigurationError::MissingEnvironmentVariable {
                    database: name.clone(),
                    source,
                }
            })?;
            Ok((
                name,
                DatabaseConnectionSettings {
                    path: PathBuf::from(path),
                    read_only: settings.read_only,
                    create_if_missing: settings.create_if_missing,
                },
            ))
        })
        .collect::<Result<_, MakeRuntimeConfigurationError>>()?;

    let configuration = Configuration {
        databases,
        default_database: parsed_config.default_database,
        pool_settings: parsed_config.pool_settings,
        query_settings: parsed_config.query_settings,
    };

    if let Some(default_database) = &configuration.default_database {
        if !configuration.databases.contains_key(default_database) {
            return Err(MakeRuntimeConfigurationError::UnknownDefaultDatabase(
                default_database.clone(),
            ));
        }
    }

    if configuration.query_settings.max_relationship_depth == 0 {
        return Err(MakeRuntimeConfigurationError::InvalidQuerySettings(
            "maxRelationshipDepth must be at least 1".to_string(),
        ));
    }

    Ok(configuration)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::environment::{FixedEnvironment, Variable};
    use crate::values::Secret;
    use crate::version1::DatabaseSettings;

    fn parsed(path: Secret, default_database: Option<&str>) -> ParsedConfiguration {
        ParsedConfiguration {
            databases: BTreeMap::from([(
                "chinook".to_string(),
                DatabaseSettings {
                    path,
                    read_only: true,
                    create_if_missing: false,
                },
            )]),
            default_database: default_database.map(ToString::to_string),
            ..ParsedConfiguration::empty()
        }
    }

    #[test]
    fn secrets_are_read_from_the_environment() {
        let environment = FixedEnvironment::from([(
            Variable::from("CHINOOK_DB"),
            "/var/lib/chinook.db".to_string(),
        )]);
        let configuration = make_runtime_configuration(
            parsed(
                Secret::FromEnvironment {
                    variable: Variable::from("CHINOOK_DB"),
                },
                Some("chinook"),
            ),
            environment,
        )
        .unwrap();

        assert_eq!(
            configuration.databases["chinook"].path,
            PathBuf::from("/var/lib/chinook.db")
        );
    }

    #[test]
    fn missing_variables_name_the_database() {
        let error = make_runtime_configuration(
            parsed(
                Secret::FromEnvironment {
                    variable: Variable::from("CHINOOK_DB"),
                },
                None,
            ),
            FixedEnvironment::default(),
        )
        .unwrap_err();

        assert_eq!(
            error.to_string(),
            "invalid configuration for database 'chinook': the environment variable CHINOOK_DB is not set"
        );
    }

    #[test]
    fn the_default_database_must_be_allow_listed() {
        let error = make_runtime_configuration(
            parsed(Secret::Plain("chinook.db".to_string()), Some("other")),
            FixedEnvironment::default(),
        )
        .unwrap_err();

        assert!(matches!(
            error,
            MakeRuntimeConfigurationError::UnknownDefaultDatabase(name) if name == "other"
        ));
    }
}
