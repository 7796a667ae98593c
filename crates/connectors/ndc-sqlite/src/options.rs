//! Process options, read from the command line or the environment.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct ServerOptions {
    /// The directory holding `configuration.json`.
    #[arg(long, env = "HASURA_CONFIGURATION_DIRECTORY", default_value = ".")]
    pub configuration: PathBuf,
    #[arg(long, env = "PORT", default_value_t = 8100)]
    pub port: u16,
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,
    /// Allow cross-origin requests from any origin.
    #[arg(
        long,
        env = "PERMISSIVE_CORS",
        value_parser = parse_truthy,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true"
    )]
    pub permissive_cors: bool,
}

/// `1`, `true`, `t`, `yes` and `y` in any case are true; anything else is false.
pub fn parse_truthy(value: &str) -> Result<bool, std::convert::Infallible> {
    let value = value.trim().to_lowercase();
    Ok(matches!(value.as_str(), "1" | "true" | "t" | "yes" | "y"))
}
