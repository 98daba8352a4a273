//! Owner commands

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use crate::AppContext;
use pedigree_core::{NewOwner, OwnerId, OwnerSearch, PedigreeRegistry};

#[derive(Args)]
pub struct OwnerArgs {
    #[command(subcommand)]
    pub command: OwnerCommands,
}

#[derive(Subcommand)]
pub enum OwnerCommands {
    /// Register a new owner
    Add {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// Contact email, unique across owners
        #[arg(long)]
        email: Option<String>,
    },
    /// List owners
    List {
        /// "first last" name contains (case-insensitive)
        #[arg(short, long)]
        name: Option<String>,
        /// Limit results
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show an owner
    Get {
        /// Owner id
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
}

pub async fn run(args: &OwnerArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let registry = &ctx.registry;

    match &args.command {
        OwnerCommands::Add {
            first_name,
            last_name,
            email,
        } => {
            let new_owner = NewOwner {
                first_name: Some(first_name.clone()),
                last_name: Some(last_name.clone()),
                email: email.clone(),
            };
            let owner = registry.create_owner(new_owner).await?;
            tracing::info!("Created owner: {} ({})", owner.full_name(), owner.id);

            match ctx.format {
                OutputFormat::Json => println!("{}", output::to_json(&owner)?),
                OutputFormat::Table => {
                    println!("Created owner: {} (id {})", owner.full_name(), owner.id)
                }
            }
        }
        OwnerCommands::List { name, limit } => {
            let search = OwnerSearch {
                name: name.clone(),
                limit: *limit,
            };
            let owners = registry.search_owners(&search).await?;

            match ctx.format {
                OutputFormat::Json => println!("{}", output::to_json(&owners)?),
                OutputFormat::Table if owners.is_empty() => println!("No owners found"),
                OutputFormat::Table => print!("{}", output::owner_table(&owners)),
            }
        }
        OwnerCommands::Get { id } => {
            let owner = registry.get_owner(OwnerId(*id)).await?;

            match ctx.format {
                OutputFormat::Json => println!("{}", output::to_json(&owner)?),
                OutputFormat::Table => print!("{}", output::owner_table(std::slice::from_ref(&owner))),
            }
        }
    }

    Ok(())
}
