mod pool_settings;
mod query_settings;
mod secret;

pub use pool_settings::PoolSettings;
pub use query_settings::QuerySettings;
pub use secret::Secret;
