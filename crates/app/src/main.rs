use std::{process::ExitCode, time::Duration};

use client::HttpTransport;

use crate::{commands::Command, config::AppConfig, error::Result};

mod commands;
mod config;
mod error;

#[tokio::main]
async fn main() -> ExitCode {
    let (config, command) = match config::load() {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "finances={level},client={level}",
            level = config.log_level
        ))
        .with_writer(std::io::stderr)
        .init();

    match run(config, command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("command failed: {err}");
            for line in err.messages() {
                eprintln!("{line}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig, command: Command) -> Result<()> {
    let transport = HttpTransport::builder()
        .base_url(&config.base_url)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    tracing::debug!("using records API at {}", transport.base_url());

    commands::run(command, transport).await
}
