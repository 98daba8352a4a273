//! Seed command: load the sample stable

use crate::output::{self, OutputFormat};
use crate::AppContext;
use pedigree_storage::load_sample_data;

pub async fn run(ctx: &AppContext) -> anyhow::Result<()> {
    let data = load_sample_data(ctx.registry.storage()).await?;

    match ctx.format {
        OutputFormat::Json => println!(
            "{}",
            output::to_json(&serde_json::json!({
                "owners": data.owners.len(),
                "horses": data.horses.len(),
            }))?
        ),
        OutputFormat::Table => println!(
            "Loaded sample data: {} owners, {} horses",
            data.owners.len(),
            data.horses.len()
        ),
    }
    Ok(())
}
