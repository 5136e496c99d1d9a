use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod memory;
pub mod models;
pub mod traits;

pub use backend::SeaOrmStorage;
pub use memory::MemoryShortLinkStore;
pub use models::{
    AuthorSummary, AuthorView, DishView, IngredientLine, InsertOutcome, NewIngredient,
    RecipeRelation, RecipeSummary, ShortLink,
};
pub use traits::ShortLinkStore;

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<SeaOrmStorage>> {
        // 从 URL 自动推断数据库类型
        let storage = backend::SeaOrmStorage::new(config).await?;
        Ok(Arc::new(storage))
    }
}
