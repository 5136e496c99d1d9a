//! Cart and favorites
//!
//! Both are per-user recipe bookmarks with the same rules, so one service
//! handles them through [`RecipeRelation`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::{FoodgramError, Result};
use crate::storage::{DishView, RecipeRelation, RecipeSummary, SeaOrmStorage};

#[derive(Clone)]
pub struct CartService {
    storage: Arc<SeaOrmStorage>,
}

impl CartService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn recipe_exists(&self, recipe_id: i32) -> Result<bool> {
        self.storage.recipe_exists(recipe_id).await
    }

    /// Dishes in the user's cart, oldest addition first.
    pub async fn cart_dishes(&self, user_id: i32) -> Result<Vec<DishView>> {
        self.storage.cart_dishes(user_id).await
    }

    pub async fn add_relation(
        &self,
        user_id: i32,
        recipe_id: i32,
        relation: RecipeRelation,
    ) -> Result<RecipeSummary> {
        let recipe = self
            .storage
            .recipe_summary(recipe_id)
            .await?
            .ok_or_else(|| recipe_not_found(recipe_id))?;

        if !self
            .storage
            .add_recipe_relation(relation, user_id, recipe_id)
            .await?
        {
            debug!(
                "User {} already has recipe {} in {}",
                user_id,
                recipe_id,
                relation.as_str()
            );
            return Err(FoodgramError::already_exists(relation.duplicate_message()));
        }

        Ok(recipe)
    }

    pub async fn remove_relation(
        &self,
        user_id: i32,
        recipe_id: i32,
        relation: RecipeRelation,
    ) -> Result<()> {
        if !self.storage.recipe_exists(recipe_id).await? {
            return Err(recipe_not_found(recipe_id));
        }

        if !self
            .storage
            .remove_recipe_relation(relation, user_id, recipe_id)
            .await?
        {
            return Err(FoodgramError::validation(relation.missing_message()));
        }

        info!(
            "User {} removed recipe {} from {}",
            user_id,
            recipe_id,
            relation.as_str()
        );
        Ok(())
    }
}

pub(crate) fn recipe_not_found(recipe_id: i32) -> FoodgramError {
    FoodgramError::not_found(format!("Recipe {} not found", recipe_id))
}
