mod common;

use std::collections::HashSet;
use std::sync::Arc;

use foodgram::config::{DEFAULT_ALPHABET, ShortLinkConfig};
use foodgram::errors::FoodgramError;
use foodgram::services::{ShortLinkService, ThreadRngSource, TokenPolicy, recipe_origin};
use foodgram::storage::{MemoryShortLinkStore, ShortLinkStore};

use common::create_temp_storage;

fn service_over(store: Arc<dyn ShortLinkStore>) -> ShortLinkService {
    ShortLinkService::new(store, &ShortLinkConfig::default()).expect("default config is valid")
}

#[cfg(test)]
mod alias_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let (storage, _temp_dir) = create_temp_storage().await;
        let service = service_over(storage);

        let first = service.get_or_create_alias("/recipes/5/").await.unwrap();
        let second = service.get_or_create_alias("/recipes/5/").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.chars().count(), 6);
        assert!(first.chars().all(|c| DEFAULT_ALPHABET.contains(c)));
    }

    #[tokio::test]
    async fn test_resolve_round_trip() {
        let (storage, _temp_dir) = create_temp_storage().await;
        let service = service_over(storage);

        let token = service.get_or_create_alias("/recipes/42/").await.unwrap();
        assert_eq!(service.resolve_alias(&token).await.unwrap(), "/recipes/42/");
    }

    #[tokio::test]
    async fn test_distinct_paths_get_distinct_tokens() {
        let (storage, _temp_dir) = create_temp_storage().await;
        let service = service_over(storage);

        let a = service.get_or_create_alias("/recipes/1/").await.unwrap();
        let b = service.get_or_create_alias("/recipes/2/").await.unwrap();
        assert_ne!(a, b);
        assert_eq!(service.resolve_alias(&a).await.unwrap(), "/recipes/1/");
        assert_eq!(service.resolve_alias(&b).await.unwrap(), "/recipes/2/");
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_found() {
        let (storage, _temp_dir) = create_temp_storage().await;
        let service = service_over(storage);

        let err = service.resolve_alias("ZZZZZZ").await.unwrap_err();
        assert!(matches!(err, FoodgramError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_resolve_is_case_sensitive() {
        let (storage, _temp_dir) = create_temp_storage().await;
        let service = service_over(storage);

        let token = service.get_or_create_alias("/recipes/9/").await.unwrap();
        let flipped: String = token
            .chars()
            .map(|c| {
                if c.is_ascii_uppercase() {
                    c.to_ascii_lowercase()
                } else {
                    c.to_ascii_uppercase()
                }
            })
            .collect();

        if flipped != token {
            assert!(matches!(
                service.resolve_alias(&flipped).await,
                Err(FoodgramError::NotFound(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_aliases_survive_new_service_instance() {
        let (storage, _temp_dir) = create_temp_storage().await;

        let token = service_over(storage.clone())
            .get_or_create_alias(&recipe_origin(3))
            .await
            .unwrap();

        // 新实例没有解析缓存，必须读库
        let fresh = service_over(storage);
        assert_eq!(fresh.resolve_alias(&token).await.unwrap(), "/recipes/3/");
        assert_eq!(fresh.get_or_create_alias("/recipes/3/").await.unwrap(), token);
    }
}

#[cfg(test)]
mod generation_tests {
    use super::*;

    #[test]
    fn test_token_alphabet_and_length_over_many_draws() {
        let policy = TokenPolicy::new(DEFAULT_ALPHABET, 6, 100).unwrap();
        let alphabet: HashSet<char> = DEFAULT_ALPHABET.chars().collect();

        for _ in 0..10_000 {
            let token = policy.generate(&ThreadRngSource);
            assert_eq!(token.chars().count(), 6);
            assert!(token.chars().all(|c| alphabet.contains(&c)), "bad token {}", token);
            assert!(!token.contains('I') && !token.contains('l'));
        }
    }

    #[tokio::test]
    async fn test_thousand_paths_get_unique_tokens() {
        let store = Arc::new(MemoryShortLinkStore::new());
        let service = service_over(store.clone());

        let mut tokens = HashSet::new();
        for id in 1..=1_000 {
            let token = service.get_or_create_alias(&recipe_origin(id)).await.unwrap();
            assert!(tokens.insert(token), "duplicate token for recipe {}", id);
        }
        assert_eq!(store.len(), 1_000);
    }

    #[tokio::test]
    async fn test_unique_tokens_in_database() {
        let (storage, _temp_dir) = create_temp_storage().await;
        let service = service_over(storage);

        let mut tokens = HashSet::new();
        for id in 1..=100 {
            tokens.insert(service.get_or_create_alias(&recipe_origin(id)).await.unwrap());
        }
        assert_eq!(tokens.len(), 100);
    }

    #[tokio::test]
    async fn test_exhaustion_when_token_space_is_full() {
        let (storage, _temp_dir) = create_temp_storage().await;
        let config = ShortLinkConfig {
            alphabet: "ab".to_string(),
            token_length: 1,
            max_attempts: 20,
            ..ShortLinkConfig::default()
        };
        let service = ShortLinkService::new(storage, &config).unwrap();

        // 两个令牌 "a" "b" 用完后，第三个路径无法分配
        let mut issued = HashSet::new();
        let mut exhausted = 0;
        for id in 1..=3 {
            match service.get_or_create_alias(&recipe_origin(id)).await {
                Ok(token) => {
                    issued.insert(token);
                }
                Err(FoodgramError::GenerationExhausted(_)) => exhausted += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert!(issued.len() <= 2);
        assert!(exhausted >= 1);
        // 已分配的仍然可解析
        for token in &issued {
            assert!(service.resolve_alias(token).await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_concurrent_requests_for_same_path_share_token() {
        let (storage, _temp_dir) = create_temp_storage().await;
        let service = Arc::new(service_over(storage));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.get_or_create_alias("/recipes/77/").await
            }));
        }

        let mut tokens = HashSet::new();
        for handle in handles {
            tokens.insert(handle.await.unwrap().unwrap());
        }
        assert_eq!(tokens.len(), 1);
    }
}
