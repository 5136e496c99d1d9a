use std::sync::Arc;

use tracing::info;

use crate::errors::{FoodgramError, Result};
use crate::storage::{AuthorSummary, SeaOrmStorage};

/// Follow / unfollow recipe authors.
#[derive(Clone)]
pub struct SubscriptionService {
    storage: Arc<SeaOrmStorage>,
}

impl SubscriptionService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn subscribe(&self, user_id: i32, author_id: i32) -> Result<AuthorSummary> {
        let mut author = self
            .storage
            .author_summary(author_id, Some(user_id))
            .await?
            .ok_or_else(|| user_not_found(author_id))?;

        if user_id == author_id {
            return Err(FoodgramError::validation("Cannot subscribe to yourself"));
        }
        if !self.storage.add_subscription(user_id, author_id).await? {
            return Err(FoodgramError::already_exists(
                "Already subscribed to this user",
            ));
        }

        info!("User {} subscribed to {}", user_id, author_id);
        author.is_subscribed = true;
        Ok(author)
    }

    pub async fn unsubscribe(&self, user_id: i32, author_id: i32) -> Result<()> {
        if self.storage.author_summary(author_id, None).await?.is_none() {
            return Err(user_not_found(author_id));
        }
        if !self.storage.remove_subscription(user_id, author_id).await? {
            return Err(FoodgramError::validation("Not subscribed to this user"));
        }

        info!("User {} unsubscribed from {}", user_id, author_id);
        Ok(())
    }
}

fn user_not_found(user_id: i32) -> FoodgramError {
    FoodgramError::not_found(format!("User {} not found", user_id))
}
