use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use ndc_sqlite::options::ServerOptions;
use ndc_sqlite::{routes, state};
use ndc_sqlite_configuration::environment::ProcessEnvironment;

#[tokio::main]
pub async fn main() -> ExitCode {
    env_logger::init();

    let options = ServerOptions::parse();
    match serve(options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(options: ServerOptions) -> anyhow::Result<()> {
    let parsed_configuration =
        ndc_sqlite_configuration::parse_configuration(&options.configuration).await?;
    let configuration = ndc_sqlite_configuration::make_runtime_configuration(
        parsed_configuration,
        ProcessEnvironment,
    )?;

    let state = Arc::new(state::create_state(configuration).await?);
    let router = routes::create_router(state, options.permissive_cors);

    let address = SocketAddr::new(options.host, options.port);
    tracing::info!(%address, permissive_cors = options.permissive_cors, "starting server");

    axum::Server::try_bind(&address)?
        .serve(router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Resolves on ctrl-c, which stops the server once in-flight requests finish.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("interrupted"),
        Err(err) => {
            tracing::error!(error = %err, "unable to listen for the shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
