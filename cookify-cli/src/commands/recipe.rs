use clap::Args;
use cookify_core::{FavoriteId, FavoriteIndicator, RecipeLookup};

use super::OutputFormat;
use crate::app::App;

/// Characters of instructions shown in search results
const SUMMARY_CHARS: usize = 140;

#[derive(Args)]
pub struct SearchCommand {
    /// Free-text query
    #[arg(default_value = "chicken")]
    pub query: String,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl SearchCommand {
    pub async fn run(&self, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err("Search query cannot be empty".into());
        }

        let recipes = app.catalog.search(query).await?;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&recipes)?);
            }
            OutputFormat::Text => {
                if recipes.is_empty() {
                    println!("No recipes found for '{}'.", query);
                    return Ok(());
                }

                let favorites = app.favorites.list().await;
                for recipe in &recipes {
                    let marker = if favorites.contains(&recipe.id) { "★" } else { " " };
                    println!("{} {:<8} {}", marker, recipe.id, recipe.name);
                    if let Some(origin) = recipe.origin() {
                        println!("           {}", origin);
                    }
                    let summary = recipe.summary(SUMMARY_CHARS);
                    if !summary.is_empty() {
                        println!("           {}", summary);
                    }
                    println!();
                }
                println!("{} recipe(s) found", recipes.len());
            }
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct ShowCommand {
    /// Recipe ID
    pub id: String,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ShowCommand {
    pub async fn run(&self, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        let id = FavoriteId::new(self.id.trim());

        let recipe = app
            .catalog
            .lookup(&id)
            .await?
            .ok_or_else(|| format!("Recipe not found: {}", id))?;

        let mut indicator = FavoriteIndicator::new(id);
        let is_favorite = indicator.activate(&app.favorites).await;

        match self.format {
            OutputFormat::Json => {
                let out = serde_json::json!({
                    "recipe": recipe,
                    "favorite": is_favorite,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            OutputFormat::Text => {
                let marker = if is_favorite { "★ Favorite" } else { "☆ Not a favorite" };
                println!("{}\n", marker);
                print!("{}", recipe);
            }
        }
        Ok(())
    }
}
