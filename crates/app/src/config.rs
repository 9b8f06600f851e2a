use clap::Parser;
use serde::Deserialize;

use crate::{commands::Command, error::Result};

const DEFAULT_CONFIG_PATH: &str = "config/finances.toml";
const ENV_PREFIX: &str = "FINANCES";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000/".to_string(),
            timeout_secs: 10,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "finances", about = "Manage categories and entries of the finance records API")]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Override request timeout, in seconds.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Override log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

pub fn load() -> Result<(AppConfig, Command)> {
    let args = Args::parse();
    let settings = settings(&args)?;
    Ok((settings, args.command))
}

fn settings(args: &Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = &args.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.timeout_secs = timeout_secs;
    }
    if let Some(log_level) = &args.log_level {
        settings.log_level = log_level.clone();
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_overrides_defaults() {
        let args = Args::try_parse_from([
            "finances",
            "--config",
            "does/not/exist",
            "--base-url",
            "http://records.local:8080",
            "--timeout-secs",
            "3",
            "categories",
            "list",
        ])
        .unwrap();

        let settings = settings(&args).unwrap();

        assert_eq!(settings.base_url, "http://records.local:8080");
        assert_eq!(settings.timeout_secs, 3);
    }

    #[test]
    fn global_flags_after_the_subcommand() {
        let args = Args::try_parse_from([
            "finances",
            "entries",
            "month",
            "--month",
            "3",
            "--year",
            "2021",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }
}
