//! Short link service
//!
//! Allocates collision-free short tokens for canonical resource paths and
//! resolves them back. Storage owns uniqueness: lookups before an insert
//! only save round-trips, the insert outcome is what decides.

use std::collections::HashSet;
use std::sync::Arc;

use moka::future::Cache;
use tracing::{debug, error, info, trace};

use crate::config::ShortLinkConfig;
use crate::errors::{FoodgramError, Result};
use crate::storage::{InsertOutcome, ShortLink, ShortLinkStore};

/// Widest token the `short_links.token` column can hold.
pub const MAX_TOKEN_LENGTH: usize = migration::TOKEN_COLUMN_WIDTH as usize;
/// Longest origin path `short_links.origin_path` can hold, in characters.
pub const MAX_ORIGIN_LENGTH: usize = migration::ORIGIN_COLUMN_WIDTH as usize;

/// Canonical long-form path of a recipe.
pub fn recipe_origin(recipe_id: i32) -> String {
    format!("/recipes/{}/", recipe_id)
}

/// Source of uniform indices used to draw token characters.
pub trait TokenSource: Send + Sync {
    /// Uniform index in `0..bound`. `bound` is never zero.
    fn pick(&self, bound: usize) -> usize;
}

/// Thread-local RNG from `rand`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl TokenSource for ThreadRngSource {
    fn pick(&self, bound: usize) -> usize {
        rand::random_range(0..bound)
    }
}

/// Validated token shape and retry budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPolicy {
    alphabet: Vec<char>,
    token_length: usize,
    max_attempts: u32,
}

impl TokenPolicy {
    pub fn new(alphabet: &str, token_length: usize, max_attempts: u32) -> Result<Self> {
        let chars: Vec<char> = alphabet.chars().collect();
        if chars.is_empty() {
            return Err(FoodgramError::config("short_link.alphabet must not be empty"));
        }
        if let Some(bad) = chars.iter().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(FoodgramError::config(format!(
                "short_link.alphabet may only contain ASCII letters and digits, found '{}'",
                bad
            )));
        }
        let mut seen = HashSet::with_capacity(chars.len());
        if let Some(dup) = chars.iter().find(|c| !seen.insert(**c)) {
            return Err(FoodgramError::config(format!(
                "short_link.alphabet contains '{}' more than once",
                dup
            )));
        }
        if token_length == 0 || token_length > MAX_TOKEN_LENGTH {
            return Err(FoodgramError::config(format!(
                "short_link.token_length must be between 1 and {}, got {}",
                MAX_TOKEN_LENGTH, token_length
            )));
        }
        if max_attempts == 0 {
            return Err(FoodgramError::config(
                "short_link.max_attempts must be at least 1",
            ));
        }

        Ok(Self {
            alphabet: chars,
            token_length,
            max_attempts,
        })
    }

    pub fn from_config(config: &ShortLinkConfig) -> Result<Self> {
        Self::new(&config.alphabet, config.token_length, config.max_attempts)
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn token_length(&self) -> usize {
        self.token_length
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Draw one candidate: `token_length` independent picks.
    pub fn generate(&self, source: &dyn TokenSource) -> String {
        (0..self.token_length)
            .map(|_| self.alphabet[source.pick(self.alphabet.len()) % self.alphabet.len()])
            .collect()
    }
}

/// Tokens that can never have been issued are rejected without a lookup.
fn is_plausible_token(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= MAX_TOKEN_LENGTH
        && token.bytes().all(|b| b.is_ascii_alphanumeric())
}

pub struct ShortLinkService {
    store: Arc<dyn ShortLinkStore>,
    policy: TokenPolicy,
    source: Arc<dyn TokenSource>,
    path_prefix: String,
    // token -> origin_path；记录一经创建不再变化，无需失效
    resolved: Cache<String, String>,
}

impl ShortLinkService {
    pub fn new(store: Arc<dyn ShortLinkStore>, config: &ShortLinkConfig) -> Result<Self> {
        let policy = TokenPolicy::from_config(config)?;
        debug!(
            "ShortLinkService using {} backend: alphabet size {}, token length {}, max attempts {}",
            store.backend_name(),
            policy.alphabet().len(),
            policy.token_length(),
            policy.max_attempts()
        );

        Ok(Self {
            store,
            policy,
            source: Arc::new(ThreadRngSource),
            path_prefix: config.path_prefix.clone(),
            resolved: Cache::builder()
                .max_capacity(config.resolve_cache_capacity)
                .build(),
        })
    }

    /// Replace the randomness source.
    pub fn with_source(mut self, source: Arc<dyn TokenSource>) -> Self {
        self.source = source;
        self
    }

    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// Return the token aliasing `origin_path`, creating one if needed.
    ///
    /// Idempotent: once a path has a token it keeps it forever.
    pub async fn get_or_create_alias(&self, origin_path: &str) -> Result<String> {
        if origin_path.is_empty() {
            return Err(FoodgramError::validation("Origin path must not be empty"));
        }
        let length = origin_path.chars().count();
        if length > MAX_ORIGIN_LENGTH {
            return Err(FoodgramError::validation(format!(
                "Origin path is {} characters long, at most {} allowed",
                length, MAX_ORIGIN_LENGTH
            )));
        }

        if let Some(existing) = self.store.find_by_origin(origin_path).await? {
            trace!("Reusing token {} for {}", existing.token, origin_path);
            return Ok(existing.token);
        }

        for attempt in 1..=self.policy.max_attempts() {
            let candidate = self.policy.generate(self.source.as_ref());

            if self.store.token_exists(&candidate).await? {
                debug!("Token candidate {} already taken (attempt {})", candidate, attempt);
                continue;
            }

            let link = ShortLink {
                origin_path: origin_path.to_string(),
                token: candidate,
            };
            match self.store.insert(&link).await? {
                InsertOutcome::Inserted => {
                    info!("Short link created: {} -> {}", link.token, link.origin_path);
                    self.resolved
                        .insert(link.token.clone(), link.origin_path)
                        .await;
                    return Ok(link.token);
                }
                InsertOutcome::TokenTaken => {
                    debug!(
                        "Token {} claimed concurrently (attempt {})",
                        link.token, attempt
                    );
                }
                InsertOutcome::OriginTaken => {
                    // 同一路径被并发创建，返回胜出的那条记录
                    return match self.store.find_by_origin(origin_path).await? {
                        Some(winner) => {
                            debug!("Concurrent alias for {} won: {}", origin_path, winner.token);
                            Ok(winner.token)
                        }
                        None => Err(FoodgramError::database_operation(format!(
                            "Short link for {} reported as existing but could not be read back",
                            origin_path
                        ))),
                    };
                }
            }
        }

        let err = FoodgramError::generation_exhausted(
            self.policy.max_attempts(),
            self.policy.token_length(),
            self.policy.alphabet().len(),
        );
        error!("{}", err);
        Err(err)
    }

    /// Look up the origin path behind `token`. Exact match only.
    pub async fn resolve_alias(&self, token: &str) -> Result<String> {
        if !is_plausible_token(token) {
            debug!("Rejected malformed token {:?}", token);
            return Err(Self::unknown_token(token));
        }

        if let Some(origin) = self.resolved.get(token).await {
            trace!("Resolve cache hit for {}", token);
            return Ok(origin);
        }

        match self.store.find_by_token(token).await? {
            Some(link) => {
                self.resolved
                    .insert(link.token, link.origin_path.clone())
                    .await;
                Ok(link.origin_path)
            }
            None => {
                debug!("Short link not found: {}", token);
                Err(Self::unknown_token(token))
            }
        }
    }

    /// Public path of an alias, e.g. `/s/Ab3xYz/`.
    pub fn short_path(&self, token: &str) -> String {
        format!("{}{}/", self.path_prefix, token)
    }

    fn unknown_token(token: &str) -> FoodgramError {
        FoodgramError::not_found(format!("Short link '{}' not found", token))
    }
}
