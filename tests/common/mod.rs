//! Shared fixtures: throwaway SQLite databases and seed rows.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use foodgram::config::DatabaseConfig;
use foodgram::storage::SeaOrmStorage;
use migration::entities::{ingredient, recipe, recipe_ingredient, user};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use tempfile::TempDir;

/// 创建临时 SQLite 数据库的存储实例
pub async fn create_temp_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..DatabaseConfig::default()
    };

    let storage = SeaOrmStorage::new(&config)
        .await
        .expect("Failed to create storage");

    (Arc::new(storage), temp_dir)
}

pub async fn insert_user(db: &DatabaseConnection, username: &str) -> i32 {
    user::ActiveModel {
        email: Set(format!("{}@example.com", username)),
        username: Set(username.to_string()),
        first_name: Set(format!("{}-first", username)),
        last_name: Set(format!("{}-last", username)),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert user")
    .id
}

pub async fn insert_ingredient(db: &DatabaseConnection, name: &str, unit: &str) -> i32 {
    ingredient::ActiveModel {
        name: Set(name.to_string()),
        measurement_unit: Set(unit.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert ingredient")
    .id
}

/// Recipe with `(ingredient_id, amount)` rows, in the given order.
pub async fn insert_recipe(
    db: &DatabaseConnection,
    author_id: i32,
    name: &str,
    cooking_time: i32,
    ingredients: &[(i32, i32)],
) -> i32 {
    let recipe_id = recipe::ActiveModel {
        author_id: Set(author_id),
        name: Set(name.to_string()),
        text: Set(format!("How to cook {}", name)),
        cooking_time: Set(cooking_time),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert recipe")
    .id;

    for (ingredient_id, amount) in ingredients {
        recipe_ingredient::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_id: Set(*ingredient_id),
            amount: Set(*amount),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert recipe ingredient");
    }

    recipe_id
}
