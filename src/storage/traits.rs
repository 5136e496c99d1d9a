use async_trait::async_trait;

use crate::errors::Result;
use crate::storage::models::{InsertOutcome, ShortLink};

/// Persistence contract for short links.
///
/// Implementations must enforce both uniqueness rules (one record per
/// `origin_path`, one record per `token`) atomically inside `insert`.
/// Lookups before `insert` are only an optimization.
#[async_trait]
pub trait ShortLinkStore: Send + Sync {
    async fn find_by_origin(&self, origin_path: &str) -> Result<Option<ShortLink>>;

    async fn find_by_token(&self, token: &str) -> Result<Option<ShortLink>>;

    async fn token_exists(&self, token: &str) -> Result<bool> {
        Ok(self.find_by_token(token).await?.is_some())
    }

    async fn insert(&self, link: &ShortLink) -> Result<InsertOutcome>;

    fn backend_name(&self) -> &str;
}
