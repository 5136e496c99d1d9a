//! CLI mode
//!
//! One-shot commands that talk to the database directly.

use std::path::Path;

use anyhow::{Context, Result, bail};
use colored::Colorize;

use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::runtime::lifetime::startup::{open_storage, prepare_server_startup};
use crate::storage::NewIngredient;

/// Run every command except `serve`.
pub async fn run_cli(command: Commands, config: &StaticConfig) -> Result<()> {
    match command {
        Commands::Serve => bail!("serve is handled by the server mode"),
        Commands::ImportIngredients { file_path } => import_ingredients(&file_path, config).await,
        Commands::Link { recipe_id } => print_link(recipe_id, config).await,
        Commands::ShoppingList {
            user_id,
            output,
            text,
        } => shopping_list(user_id, output, text, config).await,
        Commands::Config { action } => config_management(action, config),
    }
}

/// Parse an ingredient dictionary file.
pub fn read_ingredients(path: &Path) -> Result<Vec<NewIngredient>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let items: Vec<NewIngredient> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of ingredients", path.display()))?;
    Ok(items)
}

async fn import_ingredients(file_path: &str, config: &StaticConfig) -> Result<()> {
    let items = read_ingredients(Path::new(file_path))?;
    let storage = open_storage(config).await?;
    let inserted = storage.import_ingredients(&items).await?;

    println!(
        "{} Imported {} of {} ingredients ({} already present)",
        "✓".green().bold(),
        inserted.to_string().cyan(),
        items.len(),
        (items.len() as u64).saturating_sub(inserted)
    );
    Ok(())
}

async fn print_link(recipe_id: i32, config: &StaticConfig) -> Result<()> {
    let state = prepare_server_startup(config).await?;
    if !state.cart.recipe_exists(recipe_id).await? {
        bail!("Recipe {} not found", recipe_id);
    }

    let origin = crate::services::recipe_origin(recipe_id);
    let token = state.short_links.get_or_create_alias(&origin).await?;
    let path = state.short_links.short_path(&token);
    match config.server.public_base_url.as_deref() {
        Some(base) if !base.is_empty() => {
            println!("{}{}", base.trim_end_matches('/'), path)
        }
        _ => println!("{}", path),
    }
    Ok(())
}

async fn shopping_list(
    user_id: i32,
    output: Option<String>,
    text: bool,
    config: &StaticConfig,
) -> Result<()> {
    let state = prepare_server_startup(config).await?;
    let dishes = state.cart.cart_dishes(user_id).await?;

    if text {
        let list = state.shopping_list.compose(&dishes)?;
        print!("{}", list.to_text());
        return Ok(());
    }

    let pdf = state.shopping_list.build(&dishes)?;
    let output =
        output.unwrap_or_else(|| format!("{}.pdf", config.shopping_list.file_name));
    std::fs::write(&output, &pdf).with_context(|| format!("Failed to write {}", output))?;
    println!(
        "{} Wrote {} ({} dishes, {} bytes)",
        "✓".green().bold(),
        output.cyan(),
        dishes.len(),
        pdf.len()
    );
    Ok(())
}

fn config_management(action: ConfigCommands, config: &StaticConfig) -> Result<()> {
    match action {
        ConfigCommands::Generate { output_path, force } => {
            let path = output_path.unwrap_or_else(|| "config.example.toml".to_string());
            if Path::new(&path).exists() && !force {
                bail!("{} already exists, use --force to overwrite", path);
            }
            StaticConfig::default()
                .save_to_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path, e))?;
            println!("{} Sample configuration written to {}", "✓".green().bold(), path.cyan());
        }
        ConfigCommands::Show => {
            let rendered = toml::to_string_pretty(config).context("Failed to render config")?;
            print!("{}", rendered);
        }
    }
    Ok(())
}
