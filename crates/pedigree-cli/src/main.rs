//! Pedigree CLI - Command line interface for the horse registry

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{completions, horse, io, owner, seed};
use config::Config;
use output::OutputFormat;
use pedigree_core::ErrorKind;
use pedigree_storage::{Registry, SqliteStorage};

#[derive(Parser)]
#[command(name = "pedigree")]
#[command(author, version, about = "Horse and owner registry with pedigree tracking")]
pub struct Cli {
    /// Data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file
    #[arg(long, env = "PEDIGREE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format: table, json
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Config file path, honouring `--config` / `PEDIGREE_CONFIG`
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config::config_file_path)
    }

    /// Data directory: flag, then config file, then platform default
    pub fn data_dir(&self, config: &Config) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| config.data_dir())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage horses
    Horse(horse::HorseArgs),
    /// Manage owners
    Owner(owner::OwnerArgs),
    /// Load the sample stable
    Seed,
    /// Export the registry as JSON
    Export(io::ExportArgs),
    /// Import a JSON export
    Import(io::ImportArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context with the registry service
pub struct AppContext {
    pub registry: Registry<SqliteStorage>,
    pub config: Config,
    pub format: OutputFormat,
}

impl AppContext {
    pub fn new(cli: &Cli, config: Config) -> anyhow::Result<Self> {
        let format = match &cli.format {
            Some(raw) => raw.parse()?,
            None => config.format.parse()?,
        };

        let data_dir = cli.data_dir(&config);
        std::fs::create_dir_all(&data_dir)?;

        let db_path = data_dir.join("pedigree.db");
        tracing::debug!("Using database at: {:?}", db_path);

        let storage = SqliteStorage::open(&db_path)?;

        Ok(Self {
            registry: Registry::new(storage),
            config,
            format,
        })
    }
}

fn init_tracing(cli: &Cli) {
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config_path = cli.config_path();

    // Commands that never touch the registry
    match &cli.command {
        Commands::Config(args) => {
            return commands::config::run(
                args,
                &config_path,
                cli.data_dir.as_deref(),
                cli.format.as_deref(),
            )
        }
        Commands::Completions(args) => return completions::run(args),
        _ => {}
    }

    let config = Config::load(&config_path)?;
    let ctx = AppContext::new(cli, config)?;

    match &cli.command {
        Commands::Horse(args) => horse::run(args, &ctx).await?,
        Commands::Owner(args) => owner::run(args, &ctx).await?,
        Commands::Seed => seed::run(&ctx).await?,
        Commands::Export(args) => io::run_export(args, &ctx).await?,
        Commands::Import(args) => io::run_import(args, &ctx).await?,
        Commands::Config(_) | Commands::Completions(_) => {}
    }

    Ok(())
}

/// Process exit code for a failed command
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<pedigree_core::Error>().map(|e| e.kind()) {
        Some(ErrorKind::Validation) | Some(ErrorKind::InvalidInput) => 2,
        Some(ErrorKind::Conflict) => 3,
        Some(ErrorKind::NotFound) => 4,
        Some(ErrorKind::Fatal) | None => 1,
    }
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<pedigree_core::Error>() {
        Some(e) if !e.errors().is_empty() => {
            eprintln!("error: {}", e.summary());
            for line in e.errors() {
                eprintln!("  - {}", line);
            }
        }
        _ => eprintln!("error: {:#}", err),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    tracing::debug!("Starting pedigree CLI");

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::from(exit_code(&err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedigree_core::{Error, HorseId};

    #[test]
    fn test_exit_codes_follow_error_kind() {
        let validation = anyhow::Error::from(Error::validation("bad", vec!["x".to_string()]));
        let conflict = anyhow::Error::from(Error::conflict("bad", vec!["y".to_string()]));
        let missing = anyhow::Error::from(Error::HorseNotFound(HorseId(1)));
        let fatal = anyhow::Error::from(Error::fatal("boom"));
        let other = anyhow::anyhow!("plain");

        assert_eq!(exit_code(&validation), 2);
        assert_eq!(exit_code(&conflict), 3);
        assert_eq!(exit_code(&missing), 4);
        assert_eq!(exit_code(&fatal), 1);
        assert_eq!(exit_code(&other), 1);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
