use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod commands;
mod config;

use app::App;
use commands::{ConfigCommand, FavoriteCommand, SearchCommand, ShowCommand};
use config::Config;

#[derive(Parser)]
#[command(name = "cookify")]
#[command(version)]
#[command(about = "Search recipes and keep your favorites", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the recipe catalog
    Search(SearchCommand),

    /// Show a recipe's details
    Show(ShowCommand),

    /// Manage favorite recipes
    #[command(alias = "fav")]
    Favorite(FavoriteCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so JSON output on stdout stays clean.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cookify_cli=warn,cookify_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Save config path for config init
    let cli_config_path = cli.config.clone();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Search(cmd)) => {
            let app = App::from_config(&config)?;
            cmd.run(&app).await?;
        }
        Some(Commands::Show(cmd)) => {
            let app = App::from_config(&config)?;
            cmd.run(&app).await?;
        }
        Some(Commands::Favorite(cmd)) => {
            let app = App::from_config(&config)?;
            cmd.run(&app).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config, cli_config_path)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
