pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20260301_000001_recipes_schema;
mod m20260301_000002_short_links;

pub use m20260301_000002_short_links::{ORIGIN_COLUMN_WIDTH, TOKEN_COLUMN_WIDTH};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_recipes_schema::Migration),
            Box::new(m20260301_000002_short_links::Migration),
        ]
    }
}
