use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use weather_core::Config;

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-web", version, about = "Current weather and 5-day forecast pages")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the web server (default).
    Serve {
        /// Interface to bind, e.g. 127.0.0.1.
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on; overrides `PORT` and the config file.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write a config file with default settings.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let Cli { config, command } = self;
        let command = command.unwrap_or(Command::Serve { host: None, port: None });

        match command {
            Command::Serve { host, port } => {
                let mut cfg = Config::load(config.as_deref())?;
                if let Some(host) = host {
                    cfg.server.host = host;
                }
                if let Some(port) = port {
                    cfg.server.port = port;
                }
                cfg.validate().context("Invalid configuration")?;

                server::serve(cfg).await
            }
            Command::InitConfig { force } => {
                let path = match config {
                    Some(path) => path,
                    None => Config::config_file_path()?,
                };
                init_config(&path, force)
            }
        }
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file already exists: {}\nHint: pass --force to overwrite it.",
            path.display()
        );
    }

    Config::default().save_to(path)?;
    tracing::info!(path = %path.display(), "wrote default config");
    Ok(())
}
