//! `pedigree config`: read and edit the TOML config file

use std::path::Path;

use clap::{Args, Subcommand};

use crate::config::{unknown_key, Config};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print one setting
    Get {
        /// data_dir, format or default_generations
        key: String,
    },
    /// Change one setting
    Set { key: String, value: String },
    /// Reset one setting to its default
    Unset { key: String },
    /// Print every setting, marking the ones that differ from the default
    List,
    /// Print the config file location
    Path,
    /// Write a fresh config file, seeded from `--data-dir` and `--format` when given
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,

        /// Default generations for `horse tree`
        #[arg(long, allow_hyphen_values = true)]
        generations: Option<String>,
    },
}

/// Run a config command. `data_dir` and `format` are the global flags, used by `init`.
pub fn run(
    args: &ConfigArgs,
    path: &Path,
    data_dir: Option<&Path>,
    format: Option<&str>,
) -> anyhow::Result<()> {
    match &args.command {
        ConfigCommands::Get { key } => {
            let config = Config::load(path)?;
            let value = config.get(key).ok_or_else(|| unknown_key(key))?;
            println!("{}", value);
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load(path)?;
            config.set(key, value)?;
            config.save(path)?;
            tracing::info!("Config {} updated in {:?}", key, path);
            println!("{} = {}", key, config.get(key).unwrap_or_default());
        }
        ConfigCommands::Unset { key } => {
            let mut config = Config::load(path)?;
            config.unset(key)?;
            config.save(path)?;
            println!("{} = {}", key, config.get(key).unwrap_or_default());
        }
        ConfigCommands::List => {
            let config = Config::load(path)?;
            print!("{}", describe(&config));
        }
        ConfigCommands::Path => println!("{}", path.display()),
        ConfigCommands::Init { force, generations } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            let config = initial_config(data_dir, format, generations.as_deref())?;
            config.save(path)?;
            println!("Created config file at {}", path.display());
        }
    }
    Ok(())
}

/// Build the config written by `init`, checking each given value
fn initial_config(
    data_dir: Option<&Path>,
    format: Option<&str>,
    generations: Option<&str>,
) -> anyhow::Result<Config> {
    let mut config = Config::default();
    if let Some(dir) = data_dir {
        config.set("data_dir", &dir.display().to_string())?;
    }
    if let Some(format) = format {
        config.set("format", format)?;
    }
    if let Some(generations) = generations {
        config.set("default_generations", generations)?;
    }
    Ok(config)
}

/// One `key = value` line per setting; `*` marks a non-default value
fn describe(config: &Config) -> String {
    let defaults = Config::default();
    Config::keys()
        .iter()
        .map(|key| {
            let value = config.get(key).unwrap_or_default();
            let marker = if config.get(key) == defaults.get(key) { " " } else { "*" };
            format!("{} {} = {}\n", marker, key, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_config_checks_values() {
        let config = initial_config(None, Some("JSON"), Some("5")).unwrap();
        assert_eq!(config.format, "json");
        assert_eq!(config.default_generations, 5);

        assert!(initial_config(None, None, Some("-2")).is_err());
        assert!(initial_config(None, Some("xml"), None).is_err());

        let config = initial_config(Some(Path::new("/srv/stable")), None, None).unwrap();
        assert_eq!(config.data_dir(), Path::new("/srv/stable"));
    }

    #[test]
    fn test_describe_marks_changed_keys() {
        let mut config = Config::default();
        config.set("default_generations", "7").unwrap();

        let text = describe(&config);
        assert!(text.contains("* default_generations = 7"));
        assert!(text.contains("  format = table"));
        assert!(text.contains("  data_dir = (not set)"));
    }
}
