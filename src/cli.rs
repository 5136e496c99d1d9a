//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for foodgram using clap's derive macros.

use clap::{Parser, Subcommand};

/// Foodgram - recipe sharing backend
#[derive(Parser)]
#[command(name = "foodgram")]
#[command(version)]
#[command(about = "Recipe sharing backend: short links and shopping lists", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Import the ingredient dictionary from a JSON file
    ///
    /// The file holds an array of {"name": ..., "measurement_unit": ...}.
    /// Pairs that already exist are skipped.
    ImportIngredients {
        /// Input file path
        file_path: String,
    },

    /// Print the short link of a recipe, creating it if needed
    Link {
        recipe_id: i32,
    },

    /// Build the shopping list of a user's cart
    ShoppingList {
        user_id: i32,

        /// Output file (default: <shopping_list.file_name>.pdf)
        #[arg(long, short = 'o')]
        output: Option<String>,

        /// Print the list as plain text instead of writing a PDF
        #[arg(long)]
        text: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration (file + environment)
    Show,
}
