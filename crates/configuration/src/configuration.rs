//! Configuration for the connector.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::values::{PoolSettings, QuerySettings};

/// The 'Configuration' type collects all the information necessary to serve queries at runtime.
///
/// Values of this type are produced from a 'ParsedConfiguration' using
/// 'make_runtime_configuration', which resolves secrets against the environment and checks
/// that the parts of the file agree with each other.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// The allow-list: databases that requests may select, by identifier.
    pub databases: BTreeMap<String, DatabaseConnectionSettings>,
    pub default_database: Option<String>,
    pub pool_settings: PoolSettings,
    pub query_settings: QuerySettings,
}

/// How to open one allow-listed database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConnectionSettings {
    pub path: PathBuf,
    pub read_only: bool,
    pub create_if_missing: bool,
}

impl Configuration {
    /// Look up a database by the identifier a request sent, falling back to the default
    /// database when the request named none.
    ///
    /// Returns the resolved identifier with its settings, `Ok(None)` when there is nothing to
    /// fall back to, and `Err` with the requested identifier when it is not allow-listed.
    pub fn select_database<'a>(
        &'a self,
        requested: Option<&'a str>,
    ) -> Result<Option<(&'a str, &'a DatabaseConnectionSettings)>, &'a str> {
        match requested.or(self.default_database.as_deref()) {
            None => Ok(None),
            Some(name) => match self.databases.get_key_value(name) {
                Some((name, settings)) => Ok(Some((name.as_str(), settings))),
                None => Err(name),
            },
        }
    }
}
