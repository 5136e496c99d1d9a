//! ShortLinkStore implementation for SeaOrmStorage

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::{debug, error};

use super::converters::{model_to_shortlink, shortlink_to_active_model};
use super::{SeaOrmStorage, retry};
use crate::errors::{FoodgramError, Result};
use crate::storage::models::{InsertOutcome, ShortLink};
use crate::storage::traits::ShortLinkStore;

use migration::entities::short_link;

#[async_trait]
impl ShortLinkStore for SeaOrmStorage {
    async fn find_by_origin(&self, origin_path: &str) -> Result<Option<ShortLink>> {
        let db = &self.db;
        let origin = origin_path.to_string();

        retry::with_retry("short_link.find_by_origin", self.retry_config, || async {
            short_link::Entity::find_by_id(origin.clone()).one(db).await
        })
        .await
        .map(|model| model.map(model_to_shortlink))
        .map_err(|e| {
            error!("查询短链接失败（重试后仍失败）: {}", e);
            FoodgramError::database_operation(format!("Failed to load short link: {}", e))
        })
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ShortLink>> {
        let db = &self.db;

        retry::with_retry("short_link.find_by_token", self.retry_config, || async {
            short_link::Entity::find()
                .filter(short_link::Column::Token.eq(token))
                .one(db)
                .await
        })
        .await
        .map(|model| model.map(model_to_shortlink))
        .map_err(|e| {
            error!("按令牌查询短链接失败: {}", e);
            FoodgramError::database_operation(format!("Failed to resolve short link: {}", e))
        })
    }

    async fn token_exists(&self, token: &str) -> Result<bool> {
        let db = &self.db;

        let count = retry::with_retry("short_link.token_exists", self.retry_config, || async {
            short_link::Entity::find()
                .filter(short_link::Column::Token.eq(token))
                .count(db)
                .await
        })
        .await?;
        Ok(count > 0)
    }

    async fn insert(&self, link: &ShortLink) -> Result<InsertOutcome> {
        let db = &self.db;

        let result = retry::with_retry("short_link.insert", self.retry_config, || async {
            short_link::Entity::insert(shortlink_to_active_model(link))
                .exec_without_returning(db)
                .await
        })
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if retry::is_unique_violation(&e) => {
                // 两个唯一键都可能冲突：先看 origin_path 是否已被并发请求写入
                let outcome = if self.find_by_origin(&link.origin_path).await?.is_some() {
                    InsertOutcome::OriginTaken
                } else {
                    InsertOutcome::TokenTaken
                };
                debug!(
                    "Short link insert for '{}' hit a unique constraint: {:?}",
                    link.origin_path, outcome
                );
                Ok(outcome)
            }
            Err(e) => Err(FoodgramError::database_operation(format!(
                "Failed to insert short link for '{}': {}",
                link.origin_path, e
            ))),
        }
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}
