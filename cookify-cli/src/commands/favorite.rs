use clap::{Args, Subcommand};
use cookify_core::{
    FavoriteId, FavoriteIndicator, FavoritesListSurface, HydratedFavorite, Resolution,
    Unresolved,
};
use std::io::{self, Write};

use super::OutputFormat;
use crate::app::App;

#[derive(Args)]
pub struct FavoriteCommand {
    #[command(subcommand)]
    pub command: FavoriteSubcommand,
}

#[derive(Subcommand)]
pub enum FavoriteSubcommand {
    /// List favorite recipes
    List {
        /// Print only the stored ids, without contacting the catalog
        #[arg(long)]
        ids: bool,

        /// Include favorites that could not be loaded
        #[arg(long)]
        all: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Mark a recipe as favorite
    Add {
        /// Recipe ID
        id: String,
    },

    /// Unmark a favorite recipe
    Remove {
        /// Recipe ID
        id: String,
    },

    /// Flip a recipe's favorite state
    Toggle {
        /// Recipe ID
        id: String,
    },

    /// Remove all favorites
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl FavoriteCommand {
    pub async fn run(&self, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        let favorites = &app.favorites;

        match &self.command {
            FavoriteSubcommand::List { ids, all, format } => {
                if *ids {
                    let set = favorites.list().await;
                    match format {
                        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&set)?),
                        OutputFormat::Text => {
                            for id in &set {
                                println!("{}", id);
                            }
                        }
                    }
                    return Ok(());
                }

                let mut surface = FavoritesListSurface::new();
                surface.activate(favorites).await;

                if let Some(e) = surface.last_error() {
                    return Err(e.into());
                }

                let shown: Vec<&HydratedFavorite> = surface
                    .entries()
                    .iter()
                    .filter(|entry| *all || entry.is_resolved())
                    .collect();

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&shown)?);
                    }
                    OutputFormat::Text => {
                        if surface.entries().is_empty() {
                            println!("No favorites yet.");
                            return Ok(());
                        }

                        let title = format!("Favorites ({})", surface.visible().count());
                        println!("{}", title);
                        println!("{}\n", "=".repeat(title.len()));

                        for entry in shown {
                            println!("{}", format_entry(entry));
                        }

                        let hidden = surface.entries().len() - surface.visible().count();
                        if hidden > 0 && !*all {
                            println!(
                                "\n{} favorite(s) could not be loaded (use --all to show them)",
                                hidden
                            );
                        }
                    }
                }
                Ok(())
            }

            FavoriteSubcommand::Add { id } => {
                let id = parse_id(id)?;
                favorites.add(&id).await?;
                println!("★ Added {} to favorites", id);
                Ok(())
            }

            FavoriteSubcommand::Remove { id } => {
                let id = parse_id(id)?;
                favorites.remove(&id).await?;
                println!("☆ Removed {} from favorites", id);
                Ok(())
            }

            FavoriteSubcommand::Toggle { id } => {
                let mut indicator = FavoriteIndicator::new(parse_id(id)?);
                indicator.activate(favorites).await;

                if indicator.toggle(favorites).await? {
                    println!("★ {} is now a favorite", indicator.id());
                } else {
                    println!("☆ {} is no longer a favorite", indicator.id());
                }
                Ok(())
            }

            FavoriteSubcommand::Clear { force } => {
                let count = favorites.list().await.len();
                if count == 0 {
                    println!("No favorites to clear.");
                    return Ok(());
                }

                if !force {
                    print!("Remove all {} favorite(s)? [y/N] ", count);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Clear cancelled.");
                        return Ok(());
                    }
                }

                favorites.store().clear().await?;
                println!("Cleared {} favorite(s)", count);
                Ok(())
            }
        }
    }
}

fn parse_id(raw: &str) -> Result<FavoriteId, Box<dyn std::error::Error>> {
    if raw.trim().is_empty() {
        return Err("Recipe ID cannot be empty".into());
    }
    Ok(FavoriteId::new(raw))
}

fn format_entry(entry: &HydratedFavorite) -> String {
    match &entry.resolution {
        Resolution::Resolved(recipe) => match recipe.origin() {
            Some(origin) => format!("{:<8} {}  ({})", entry.id, recipe.name, origin),
            None => format!("{:<8} {}", entry.id, recipe.name),
        },
        Resolution::Unresolved(Unresolved::NotFound) => {
            format!("{:<8} ? no longer in the catalog", entry.id)
        }
        Resolution::Unresolved(Unresolved::Failed(e)) => {
            format!("{:<8} ? could not load: {}", entry.id, e)
        }
    }
}
