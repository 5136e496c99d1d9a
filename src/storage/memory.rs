//! In-process short link store
//!
//! Both uniqueness rules are checked under one lock, so `insert` is atomic
//! like a database constraint.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::Result;
use crate::storage::models::{InsertOutcome, ShortLink};
use crate::storage::traits::ShortLinkStore;

#[derive(Default)]
struct Tables {
    by_origin: HashMap<String, String>,
    by_token: HashMap<String, String>,
}

#[derive(Default)]
pub struct MemoryShortLinkStore {
    tables: Mutex<Tables>,
}

impl MemoryShortLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tables.lock().by_origin.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ShortLinkStore for MemoryShortLinkStore {
    async fn find_by_origin(&self, origin_path: &str) -> Result<Option<ShortLink>> {
        let tables = self.tables.lock();
        Ok(tables.by_origin.get(origin_path).map(|token| ShortLink {
            origin_path: origin_path.to_string(),
            token: token.clone(),
        }))
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ShortLink>> {
        let tables = self.tables.lock();
        Ok(tables.by_token.get(token).map(|origin| ShortLink {
            origin_path: origin.clone(),
            token: token.to_string(),
        }))
    }

    async fn insert(&self, link: &ShortLink) -> Result<InsertOutcome> {
        let mut tables = self.tables.lock();
        if tables.by_origin.contains_key(&link.origin_path) {
            return Ok(InsertOutcome::OriginTaken);
        }
        if tables.by_token.contains_key(&link.token) {
            return Ok(InsertOutcome::TokenTaken);
        }
        tables
            .by_origin
            .insert(link.origin_path.clone(), link.token.clone());
        tables
            .by_token
            .insert(link.token.clone(), link.origin_path.clone());
        Ok(InsertOutcome::Inserted)
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
