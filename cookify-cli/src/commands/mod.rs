use clap::ValueEnum;

mod config_cmd;
mod favorite;
mod recipe;

pub use config_cmd::ConfigCommand;
pub use favorite::FavoriteCommand;
pub use recipe::{SearchCommand, ShowCommand};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
