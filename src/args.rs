use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Clone)]
pub enum Command {
    /// Print the built-in level
    ExampleLevel {
        /// Print it in the JSON level format instead
        #[arg(long)]
        json: bool,
    },
    /// Print the default config
    ExampleConfig,
    /// Explore a generated dungeon (default)
    Dungeon {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Walk through a level in first person
    Raycast {
        level: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
