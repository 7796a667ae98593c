pub mod configuration;
pub mod connector_config;
pub mod environment;
pub mod error;
pub mod to_runtime_configuration;
pub mod values;
pub mod version1;

pub use configuration::{Configuration, DatabaseConnectionSettings};
pub use connector_config::{ConnectorConfig, CONNECTOR_CONFIG_HEADER};
pub use to_runtime_configuration::make_runtime_configuration;
pub use values::{PoolSettings, QuerySettings, Secret};
pub use version1::{parse_configuration, ParsedConfiguration};
