//! Horse commands

use chrono::NaiveDate;
use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use crate::AppContext;
use pedigree_core::limits::DEFAULT_SUGGESTION_LIMIT;
use pedigree_core::{
    AncestryQuery, AncestryTree, Error, HorseId, HorseInput, HorseSearch, OwnerId,
    PedigreeRegistry, Sex,
};

#[derive(Args)]
pub struct HorseArgs {
    #[command(subcommand)]
    pub command: HorseCommands,
}

#[derive(Subcommand)]
pub enum HorseCommands {
    /// Register a new horse
    Add {
        /// Horse name
        #[arg(short, long)]
        name: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: NaiveDate,
        /// MALE or FEMALE
        #[arg(short, long)]
        sex: String,
        /// Free-text description
        #[arg(long)]
        description: Option<String>,
        /// Owner id
        #[arg(long, allow_negative_numbers = true)]
        owner: Option<i64>,
        /// Mother id
        #[arg(long, allow_negative_numbers = true)]
        mother: Option<i64>,
        /// Father id
        #[arg(long, allow_negative_numbers = true)]
        father: Option<i64>,
    },
    /// Update an existing horse; omitted fields keep their stored value
    Update {
        /// Horse id
        #[arg(allow_negative_numbers = true)]
        id: i64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long)]
        dob: Option<NaiveDate>,
        #[arg(short, long)]
        sex: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, allow_negative_numbers = true, conflicts_with = "clear_owner")]
        owner: Option<i64>,
        #[arg(long, allow_negative_numbers = true, conflicts_with = "clear_mother")]
        mother: Option<i64>,
        #[arg(long, allow_negative_numbers = true, conflicts_with = "clear_father")]
        father: Option<i64>,
        /// Remove the owner reference
        #[arg(long)]
        clear_owner: bool,
        /// Remove the mother reference
        #[arg(long)]
        clear_mother: bool,
        /// Remove the father reference
        #[arg(long)]
        clear_father: bool,
    },
    /// Show a horse with owner and parents
    Get {
        /// Horse id
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// List horses
    List {
        /// Name contains (case-insensitive)
        #[arg(short, long)]
        name: Option<String>,
        /// Description contains (case-insensitive)
        #[arg(long)]
        description: Option<String>,
        /// MALE or FEMALE
        #[arg(short, long)]
        sex: Option<String>,
        /// Born on or before this date (default: today)
        #[arg(long)]
        born_before: Option<NaiveDate>,
        /// Owner "first last" name contains
        #[arg(long)]
        owner_name: Option<String>,
        /// Limit results
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Delete a horse
    Delete {
        /// Horse id
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// Show the family tree of a horse
    Tree {
        /// Root horse id
        #[arg(allow_negative_numbers = true)]
        id: i64,
        /// Generations to climb (default from config)
        #[arg(short, long, allow_hyphen_values = true)]
        generations: Option<String>,
    },
    /// Suggest horses that could fill a parent slot
    Parents {
        /// FEMALE for mothers, MALE for fathers
        #[arg(short, long)]
        sex: String,
        /// Name contains
        #[arg(short, long)]
        name: Option<String>,
        /// Limit results
        #[arg(short, long, default_value_t = DEFAULT_SUGGESTION_LIMIT)]
        limit: usize,
    },
}

// Filters accept any casing; stored records and drafts must use the literals
fn parse_sex(raw: &str) -> Result<Sex, Error> {
    raw.trim()
        .to_ascii_uppercase()
        .parse::<Sex>()
        .map_err(|e| Error::InvalidInput(e.to_string()))
}

pub async fn run(args: &HorseArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let registry = &ctx.registry;

    match &args.command {
        HorseCommands::Add {
            name,
            dob,
            sex,
            description,
            owner,
            mother,
            father,
        } => {
            let input = HorseInput {
                id: None,
                name: Some(name.clone()),
                description: description.clone(),
                date_of_birth: Some(*dob),
                sex: Some(sex.clone()),
                owner_id: owner.map(OwnerId),
                mother_id: mother.map(HorseId),
                father_id: father.map(HorseId),
            };
            let detail = registry.create_horse(input).await?;
            tracing::info!("Created horse: {} ({})", detail.horse.name, detail.horse.id);

            match ctx.format {
                OutputFormat::Json => println!("{}", output::to_json(&detail)?),
                OutputFormat::Table => {
                    println!("Created horse: {} (id {})", detail.horse.name, detail.horse.id);
                    print!("{}", output::horse_detail(&detail));
                }
            }
        }
        HorseCommands::Update {
            id,
            name,
            dob,
            sex,
            description,
            owner,
            mother,
            father,
            clear_owner,
            clear_mother,
            clear_father,
        } => {
            let id = HorseId(*id);
            let stored = registry.get_horse(id).await?.horse;

            let mut input = HorseInput::from_horse(&stored);
            if let Some(name) = name {
                input.name = Some(name.clone());
            }
            if let Some(dob) = dob {
                input.date_of_birth = Some(*dob);
            }
            if let Some(sex) = sex {
                input.sex = Some(sex.clone());
            }
            if let Some(description) = description {
                input.description = Some(description.clone());
            }
            if let Some(owner) = owner {
                input.owner_id = Some(OwnerId(*owner));
            }
            if let Some(mother) = mother {
                input.mother_id = Some(HorseId(*mother));
            }
            if let Some(father) = father {
                input.father_id = Some(HorseId(*father));
            }
            if *clear_owner {
                input.owner_id = None;
            }
            if *clear_mother {
                input.mother_id = None;
            }
            if *clear_father {
                input.father_id = None;
            }

            let detail = registry.update_horse(id, input).await?;
            match ctx.format {
                OutputFormat::Json => println!("{}", output::to_json(&detail)?),
                OutputFormat::Table => {
                    println!("Updated horse: {} (id {})", detail.horse.name, detail.horse.id);
                    print!("{}", output::horse_detail(&detail));
                }
            }
        }
        HorseCommands::Get { id } => {
            let detail = registry.get_horse(HorseId(*id)).await?;
            match ctx.format {
                OutputFormat::Json => println!("{}", output::to_json(&detail)?),
                OutputFormat::Table => print!("{}", output::horse_detail(&detail)),
            }
        }
        HorseCommands::List {
            name,
            description,
            sex,
            born_before,
            owner_name,
            limit,
        } => {
            let search = HorseSearch {
                name: name.clone(),
                description: description.clone(),
                born_before: *born_before,
                sex: sex.as_deref().map(parse_sex).transpose()?,
                owner_name: owner_name.clone(),
                limit: *limit,
            };
            let items = registry.list_horses(&search).await?;
            tracing::info!("Found {} horses", items.len());

            match ctx.format {
                OutputFormat::Json => println!("{}", output::to_json(&items)?),
                OutputFormat::Table if items.is_empty() => println!("No horses found"),
                OutputFormat::Table => print!("{}", output::horse_table(&items)),
            }
        }
        HorseCommands::Delete { id } => {
            let id = HorseId(*id);
            registry.delete_horse(id).await?;
            match ctx.format {
                OutputFormat::Json => {
                    println!("{}", output::to_json(&serde_json::json!({ "deleted": id }))?)
                }
                OutputFormat::Table => println!("Deleted horse {}", id),
            }
        }
        HorseCommands::Tree { id, generations } => {
            let root = HorseId(*id);
            let query = match generations {
                Some(raw) => AncestryQuery::parse(root, raw)?,
                None => AncestryQuery::new(root, i64::from(ctx.config.default_generations))?,
            };

            let records = registry.family_tree(&query).await?;
            let Some(tree) = AncestryTree::from_records(&records) else {
                return Err(Error::HorseNotFound(root).into());
            };

            match ctx.format {
                OutputFormat::Json => println!("{}", output::to_json(&records)?),
                OutputFormat::Table => print!("{}", output::family_tree(&tree)),
            }
        }
        HorseCommands::Parents { sex, name, limit } => {
            let sex = parse_sex(sex)?;
            let items = registry
                .parent_candidates(name.as_deref(), sex, *limit)
                .await?;

            match ctx.format {
                OutputFormat::Json => println!("{}", output::to_json(&items)?),
                OutputFormat::Table if items.is_empty() => println!("No candidates found"),
                OutputFormat::Table => print!("{}", output::horse_table(&items)),
            }
        }
    }

    Ok(())
}
