//! Recipe-side queries for SeaOrmStorage
//!
//! Cart contents, favorite / shopping-cart bookmarks, subscriptions and the
//! ingredient dictionary import.

use std::collections::{HashMap, HashSet};

use sea_orm::{
    ActiveValue::Set, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    sea_query::OnConflict,
};
use tracing::{debug, info};

use super::converters::assemble_dish_view;
use super::{SeaOrmStorage, retry};
use crate::errors::{FoodgramError, Result};
use crate::storage::models::{
    AuthorSummary, DishView, IngredientLine, NewIngredient, RecipeRelation, RecipeSummary,
};

use migration::entities::{
    favorite, ingredient, recipe, recipe_ingredient, shopping_cart, subscription, user,
};

impl SeaOrmStorage {
    pub async fn recipe_exists(&self, recipe_id: i32) -> Result<bool> {
        Ok(self.recipe_summary(recipe_id).await?.is_some())
    }

    pub async fn recipe_summary(&self, recipe_id: i32) -> Result<Option<RecipeSummary>> {
        let db = &self.db;
        let model = retry::with_retry("recipe.find", self.retry_config, || async {
            recipe::Entity::find_by_id(recipe_id).one(db).await
        })
        .await?;

        Ok(model.map(|r| RecipeSummary {
            id: r.id,
            name: r.name,
            cooking_time: u32::try_from(r.cooking_time).unwrap_or(0),
        }))
    }

    /// Recipes in the user's cart, in the order they were added.
    pub async fn cart_dishes(&self, user_id: i32) -> Result<Vec<DishView>> {
        let db = &self.db;
        let entries = retry::with_retry("cart.list", self.retry_config, || async {
            shopping_cart::Entity::find()
                .filter(shopping_cart::Column::UserId.eq(user_id))
                .order_by_asc(shopping_cart::Column::Id)
                .all(db)
                .await
        })
        .await?;

        let recipe_ids: Vec<i32> = entries.iter().map(|e| e.recipe_id).collect();
        debug!("User {} has {} recipes in cart", user_id, recipe_ids.len());
        self.dish_views(&recipe_ids).await
    }

    /// Load dish views for `recipe_ids`, preserving their order.
    ///
    /// Ids without a recipe row are skipped.
    pub async fn dish_views(&self, recipe_ids: &[i32]) -> Result<Vec<DishView>> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }
        let db = &self.db;

        let recipes: HashMap<i32, recipe::Model> =
            retry::with_retry("dish.recipes", self.retry_config, || async {
                recipe::Entity::find()
                    .filter(recipe::Column::Id.is_in(recipe_ids.iter().copied()))
                    .all(db)
                    .await
            })
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        let author_ids: HashSet<i32> = recipes.values().map(|r| r.author_id).collect();
        let authors: HashMap<i32, user::Model> =
            retry::with_retry("dish.authors", self.retry_config, || async {
                user::Entity::find()
                    .filter(user::Column::Id.is_in(author_ids.iter().copied()))
                    .all(db)
                    .await
            })
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let rows = retry::with_retry("dish.ingredient_rows", self.retry_config, || async {
            recipe_ingredient::Entity::find()
                .filter(recipe_ingredient::Column::RecipeId.is_in(recipes.keys().copied()))
                .order_by_asc(recipe_ingredient::Column::Id)
                .all(db)
                .await
        })
        .await?;

        let ingredient_ids: HashSet<i32> = rows.iter().map(|row| row.ingredient_id).collect();
        let ingredients: HashMap<i32, ingredient::Model> =
            retry::with_retry("dish.ingredients", self.retry_config, || async {
                ingredient::Entity::find()
                    .filter(ingredient::Column::Id.is_in(ingredient_ids.iter().copied()))
                    .all(db)
                    .await
            })
            .await?
            .into_iter()
            .map(|i| (i.id, i))
            .collect();

        let mut lines: HashMap<i32, Vec<IngredientLine>> = HashMap::new();
        for row in rows {
            let item = ingredients.get(&row.ingredient_id).ok_or_else(|| {
                FoodgramError::database_operation(format!(
                    "Recipe {} references missing ingredient {}",
                    row.recipe_id, row.ingredient_id
                ))
            })?;
            lines.entry(row.recipe_id).or_default().push(IngredientLine {
                name: item.name.clone(),
                measurement_unit: item.measurement_unit.clone(),
                amount: u32::try_from(row.amount).unwrap_or(0),
            });
        }

        let mut views = Vec::with_capacity(recipe_ids.len());
        for id in recipe_ids {
            let Some(recipe) = recipes.get(id) else {
                continue;
            };
            let author = authors.get(&recipe.author_id).ok_or_else(|| {
                FoodgramError::database_operation(format!(
                    "Recipe {} references missing author {}",
                    recipe.id, recipe.author_id
                ))
            })?;
            views.push(assemble_dish_view(
                recipe,
                author,
                lines.remove(id).unwrap_or_default(),
            ));
        }
        Ok(views)
    }

    /// Returns `false` when the pair already existed.
    pub async fn add_recipe_relation(
        &self,
        relation: RecipeRelation,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool> {
        let db = &self.db;
        let result = match relation {
            RecipeRelation::Favorite => favorite::Entity::insert(favorite::ActiveModel {
                user_id: Set(user_id),
                recipe_id: Set(recipe_id),
                ..Default::default()
            })
            .exec_without_returning(db)
            .await
            .map(|_| ()),
            RecipeRelation::ShoppingCart => {
                shopping_cart::Entity::insert(shopping_cart::ActiveModel {
                    user_id: Set(user_id),
                    recipe_id: Set(recipe_id),
                    ..Default::default()
                })
                .exec_without_returning(db)
                .await
                .map(|_| ())
            }
        };

        match result {
            Ok(()) => {
                info!(
                    "User {} added recipe {} to {}",
                    user_id,
                    recipe_id,
                    relation.as_str()
                );
                Ok(true)
            }
            Err(e) if retry::is_unique_violation(&e) => Ok(false),
            Err(e) if retry::is_foreign_key_violation(&e) => {
                debug!("Relation insert for user {} hit a missing row", user_id);
                Err(match self.recipe_exists(recipe_id).await {
                    Ok(false) => FoodgramError::not_found(format!("Recipe {} not found", recipe_id)),
                    Ok(true) => user_not_found(user_id),
                    Err(lookup) => lookup,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Returns `false` when there was nothing to delete.
    pub async fn remove_recipe_relation(
        &self,
        relation: RecipeRelation,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool> {
        let db = &self.db;
        let deleted = match relation {
            RecipeRelation::Favorite => {
                favorite::Entity::delete_many()
                    .filter(favorite::Column::UserId.eq(user_id))
                    .filter(favorite::Column::RecipeId.eq(recipe_id))
                    .exec(db)
                    .await?
                    .rows_affected
            }
            RecipeRelation::ShoppingCart => {
                shopping_cart::Entity::delete_many()
                    .filter(shopping_cart::Column::UserId.eq(user_id))
                    .filter(shopping_cart::Column::RecipeId.eq(recipe_id))
                    .exec(db)
                    .await?
                    .rows_affected
            }
        };
        Ok(deleted > 0)
    }

    pub async fn author_summary(
        &self,
        author_id: i32,
        viewer_id: Option<i32>,
    ) -> Result<Option<AuthorSummary>> {
        let db = &self.db;
        let Some(author) = retry::with_retry("user.find", self.retry_config, || async {
            user::Entity::find_by_id(author_id).one(db).await
        })
        .await?
        else {
            return Ok(None);
        };

        let is_subscribed = match viewer_id {
            Some(viewer) => self.is_subscribed(viewer, author_id).await?,
            None => false,
        };

        Ok(Some(AuthorSummary {
            id: author.id,
            email: author.email,
            username: author.username,
            first_name: author.first_name,
            last_name: author.last_name,
            is_subscribed,
        }))
    }

    pub async fn is_subscribed(&self, user_id: i32, author_id: i32) -> Result<bool> {
        let count = subscription::Entity::find()
            .filter(subscription::Column::UserId.eq(user_id))
            .filter(subscription::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// Returns `false` when the subscription already existed.
    pub async fn add_subscription(&self, user_id: i32, author_id: i32) -> Result<bool> {
        let result = subscription::Entity::insert(subscription::ActiveModel {
            user_id: Set(user_id),
            author_id: Set(author_id),
            ..Default::default()
        })
        .exec_without_returning(&self.db)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) if retry::is_unique_violation(&e) => Ok(false),
            Err(e) if retry::is_foreign_key_violation(&e) => {
                // 作者在服务层已检查过，缺的多半是订阅者自己
                Err(match self.user_exists(author_id).await {
                    Ok(false) => user_not_found(author_id),
                    Ok(true) => user_not_found(user_id),
                    Err(lookup) => lookup,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn user_exists(&self, user_id: i32) -> Result<bool> {
        let db = &self.db;
        let count = retry::with_retry("user.exists", self.retry_config, || async {
            user::Entity::find_by_id(user_id).count(db).await
        })
        .await?;
        Ok(count > 0)
    }

    pub async fn remove_subscription(&self, user_id: i32, author_id: i32) -> Result<bool> {
        let result = subscription::Entity::delete_many()
            .filter(subscription::Column::UserId.eq(user_id))
            .filter(subscription::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Bulk insert ingredients, skipping existing `(name, measurement_unit)` pairs.
    ///
    /// Returns the number of inserted rows.
    pub async fn import_ingredients(&self, items: &[NewIngredient]) -> Result<u64> {
        if items.is_empty() {
            return Ok(0);
        }

        let models = items.iter().map(|item| ingredient::ActiveModel {
            name: Set(item.name.clone()),
            measurement_unit: Set(item.measurement_unit.clone()),
            ..Default::default()
        });

        let result = ingredient::Entity::insert_many(models)
            .on_conflict(
                OnConflict::columns([
                    ingredient::Column::Name,
                    ingredient::Column::MeasurementUnit,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;

        match result {
            Ok(inserted) => {
                info!(
                    "Imported {} of {} ingredients",
                    inserted,
                    items.len()
                );
                Ok(inserted)
            }
            // 全部冲突时部分驱动不返回任何行
            Err(DbErr::RecordNotInserted) => Ok(0),
            Err(e) => Err(FoodgramError::database_operation(format!(
                "Failed to import ingredients: {}",
                e
            ))),
        }
    }
}

fn user_not_found(user_id: i32) -> FoodgramError {
    FoodgramError::not_found(format!("User {} not found", user_id))
}
