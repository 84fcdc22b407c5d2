use anyhow::Context;
use clap::Parser;
use server::app::ApplicationServer;
use std::sync::Arc;
use utils::{AppConfig, Logger};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load the env file matching CARGO_ENV before clap reads the process env
    utils::EnvLoader::load_env_file().ok();

    let config = Arc::new(AppConfig::parse());

    // the guard keeps the background log writer alive until exit
    let _guard = Logger::new(config.cargo_env);

    ApplicationServer::serve(config).await.context("🔴 Failed to start server")?;

    Ok(())
}
