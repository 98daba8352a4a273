//! Import/Export commands

use std::io::Write;
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use clap::Args;
use serde::{Deserialize, Serialize};

use crate::AppContext;
use pedigree_core::{Horse, Owner};
use pedigree_storage::StorageBackend;

/// Current export format version
pub const EXPORT_VERSION: &str = "1.0";

#[derive(Args)]
pub struct ImportArgs {
    /// Input file (JSON format)
    pub file: PathBuf,

    /// Merge with existing data (default: error if the registry is not empty)
    #[arg(long)]
    pub merge: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Full registry dump; ids are preserved so parent references stay intact
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub version: String,
    #[serde(default)]
    pub owners: Vec<Owner>,
    #[serde(default)]
    pub horses: Vec<Horse>,
}

pub async fn run_import(args: &ImportArgs, ctx: &AppContext) -> anyhow::Result<()> {
    tracing::info!("Importing from {:?}", args.file);

    let content = std::fs::read_to_string(&args.file)?;
    let data: ExportData = serde_json::from_str(&content)?;

    tracing::debug!("Import format version: {}", data.version);
    if data.version != EXPORT_VERSION {
        anyhow::bail!(
            "Unsupported export version '{}', expected '{}'",
            data.version,
            EXPORT_VERSION
        );
    }

    let storage = ctx.registry.storage();
    if !args.merge {
        let horse_count = storage.get_all_horses().await?.len();
        if horse_count > 0 {
            anyhow::bail!(
                "Registry already has {} horses. Use --merge to add to existing data.",
                horse_count
            );
        }
    }

    // Owners first so horse owner references resolve
    for owner in &data.owners {
        storage.insert_owner(owner).await?;
    }
    for horse in &data.horses {
        storage.insert_horse(horse).await?;
    }

    tracing::info!(
        "Imported {} owners and {} horses",
        data.owners.len(),
        data.horses.len()
    );
    println!(
        "Imported {} owners and {} horses from {:?}",
        data.owners.len(),
        data.horses.len(),
        args.file
    );

    Ok(())
}

pub async fn run_export(args: &ExportArgs, ctx: &AppContext) -> anyhow::Result<()> {
    tracing::info!("Exporting data");

    let storage = ctx.registry.storage();
    let export_data = ExportData {
        version: EXPORT_VERSION.to_string(),
        owners: storage.get_all_owners().await?,
        horses: storage.get_all_horses().await?,
    };

    tracing::debug!(
        "Exporting {} owners, {} horses",
        export_data.owners.len(),
        export_data.horses.len()
    );

    let content = serde_json::to_string_pretty(&export_data)?;

    if let Some(ref path) = args.output {
        // Write with secure permissions (0o600 = owner read/write only)
        #[cfg(unix)]
        {
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)?;
            file.write_all(content.as_bytes())?;
        }
        #[cfg(not(unix))]
        {
            std::fs::write(path, &content)?;
        }
        println!("Exported to {:?}", path);
    } else {
        println!("{}", content);
    }

    Ok(())
}
