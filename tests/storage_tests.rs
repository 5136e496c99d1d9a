mod common;

use foodgram::errors::FoodgramError;
use foodgram::storage::{InsertOutcome, NewIngredient, RecipeRelation, ShortLink, ShortLinkStore};

use common::{create_temp_storage, insert_ingredient, insert_recipe, insert_user};

fn link(origin: &str, token: &str) -> ShortLink {
    ShortLink {
        origin_path: origin.to_string(),
        token: token.to_string(),
    }
}

fn ingredient(name: &str, unit: &str) -> NewIngredient {
    NewIngredient {
        name: name.to_string(),
        measurement_unit: unit.to_string(),
    }
}

#[cfg(test)]
mod short_link_store_tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let (storage, _temp_dir) = create_temp_storage().await;

        assert_eq!(
            storage.insert(&link("/recipes/1/", "Ab3xYz")).await.unwrap(),
            InsertOutcome::Inserted
        );
        assert_eq!(
            storage.find_by_token("Ab3xYz").await.unwrap(),
            Some(link("/recipes/1/", "Ab3xYz"))
        );
        assert_eq!(
            storage.find_by_origin("/recipes/1/").await.unwrap(),
            Some(link("/recipes/1/", "Ab3xYz"))
        );
        assert!(storage.token_exists("Ab3xYz").await.unwrap());
        assert!(!storage.token_exists("ab3xyz").await.unwrap());
    }

    #[tokio::test]
    async fn test_unique_constraints_are_reported() {
        let (storage, _temp_dir) = create_temp_storage().await;
        storage.insert(&link("/recipes/1/", "AAAAAA")).await.unwrap();

        assert_eq!(
            storage.insert(&link("/recipes/1/", "BBBBBB")).await.unwrap(),
            InsertOutcome::OriginTaken
        );
        assert_eq!(
            storage.insert(&link("/recipes/2/", "AAAAAA")).await.unwrap(),
            InsertOutcome::TokenTaken
        );
        assert!(storage.find_by_origin("/recipes/2/").await.unwrap().is_none());
        assert!(storage.find_by_token("BBBBBB").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_backend_name() {
        let (storage, _temp_dir) = create_temp_storage().await;
        assert_eq!(storage.backend_name(), "sqlite");
        assert_eq!(storage.get_backend_config().storage_type, "sqlite");
    }
}

#[cfg(test)]
mod cart_tests {
    use super::*;

    #[tokio::test]
    async fn test_cart_keeps_insertion_order() {
        let (storage, _temp_dir) = create_temp_storage().await;
        let db = storage.get_db();
        let author = insert_user(db, "chef").await;
        let buyer = insert_user(db, "buyer").await;
        let salt = insert_ingredient(db, "Salt", "g").await;

        let soup = insert_recipe(db, author, "Soup", 30, &[(salt, 5)]).await;
        let salad = insert_recipe(db, author, "Salad", 10, &[(salt, 2)]).await;

        // 先加入后创建的菜谱
        assert!(storage.add_recipe_relation(RecipeRelation::ShoppingCart, buyer, salad).await.unwrap());
        assert!(storage.add_recipe_relation(RecipeRelation::ShoppingCart, buyer, soup).await.unwrap());

        let dishes = storage.cart_dishes(buyer).await.unwrap();
        let names: Vec<&str> = dishes.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Salad", "Soup"]);
    }

    #[tokio::test]
    async fn test_dish_view_fields() {
        let (storage, _temp_dir) = create_temp_storage().await;
        let db = storage.get_db();
        let author = insert_user(db, "anna").await;
        let flour = insert_ingredient(db, "Flour", "g").await;
        let milk = insert_ingredient(db, "Milk", "ml").await;
        let pancakes = insert_recipe(db, author, "Pancakes", 20, &[(flour, 200), (milk, 300)]).await;

        storage
            .add_recipe_relation(RecipeRelation::ShoppingCart, author, pancakes)
            .await
            .unwrap();
        let dishes = storage.cart_dishes(author).await.unwrap();
        assert_eq!(dishes.len(), 1);

        let dish = &dishes[0];
        assert_eq!(dish.name, "Pancakes");
        assert_eq!(dish.cooking_time, 20);
        assert_eq!(dish.text, "How to cook Pancakes");
        assert_eq!(dish.author.display_name(), "anna-first anna-last (anna)");
        assert_eq!(dish.ingredients.len(), 2);
        assert_eq!(dish.ingredients[0].name, "Flour");
        assert_eq!(dish.ingredients[0].amount, 200);
        assert_eq!(dish.ingredients[1].measurement_unit, "ml");
    }

    #[tokio::test]
    async fn test_empty_cart() {
        let (storage, _temp_dir) = create_temp_storage().await;
        let user = insert_user(storage.get_db(), "nobody").await;
        assert!(storage.cart_dishes(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_relation_duplicates_and_removal() {
        let (storage, _temp_dir) = create_temp_storage().await;
        let db = storage.get_db();
        let user = insert_user(db, "u1").await;
        let recipe = insert_recipe(db, user, "Tea", 5, &[]).await;

        for relation in [RecipeRelation::Favorite, RecipeRelation::ShoppingCart] {
            assert!(storage.add_recipe_relation(relation, user, recipe).await.unwrap());
            assert!(!storage.add_recipe_relation(relation, user, recipe).await.unwrap());
            assert!(storage.remove_recipe_relation(relation, user, recipe).await.unwrap());
            assert!(!storage.remove_recipe_relation(relation, user, recipe).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_relation_for_unknown_user_is_not_found() {
        let (storage, _temp_dir) = create_temp_storage().await;
        let db = storage.get_db();
        let author = insert_user(db, "chef").await;
        let recipe = insert_recipe(db, author, "Soup", 10, &[]).await;

        for relation in [RecipeRelation::Favorite, RecipeRelation::ShoppingCart] {
            let err = storage
                .add_recipe_relation(relation, 9999, recipe)
                .await
                .unwrap_err();
            assert!(matches!(err, FoodgramError::NotFound(_)));
            assert_eq!(err.message(), "User 9999 not found");
        }

        let err = storage
            .add_recipe_relation(RecipeRelation::ShoppingCart, author, 9999)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Recipe 9999 not found");
        assert!(storage.cart_dishes(author).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_favorite_and_cart_are_independent() {
        let (storage, _temp_dir) = create_temp_storage().await;
        let db = storage.get_db();
        let user = insert_user(db, "u2").await;
        let recipe = insert_recipe(db, user, "Toast", 3, &[]).await;

        storage
            .add_recipe_relation(RecipeRelation::Favorite, user, recipe)
            .await
            .unwrap();
        assert!(storage.cart_dishes(user).await.unwrap().is_empty());
        assert!(!storage
            .remove_recipe_relation(RecipeRelation::ShoppingCart, user, recipe)
            .await
            .unwrap());
    }
}

#[cfg(test)]
mod subscription_tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_cycle() {
        let (storage, _temp_dir) = create_temp_storage().await;
        let db = storage.get_db();
        let reader = insert_user(db, "reader").await;
        let author = insert_user(db, "author").await;

        assert!(!storage.is_subscribed(reader, author).await.unwrap());
        assert!(storage.add_subscription(reader, author).await.unwrap());
        assert!(!storage.add_subscription(reader, author).await.unwrap());
        assert!(storage.is_subscribed(reader, author).await.unwrap());

        let summary = storage.author_summary(author, Some(reader)).await.unwrap().unwrap();
        assert_eq!(summary.username, "author");
        assert_eq!(summary.email, "author@example.com");
        assert!(summary.is_subscribed);

        assert!(storage.remove_subscription(reader, author).await.unwrap());
        assert!(!storage.remove_subscription(reader, author).await.unwrap());
    }

    #[tokio::test]
    async fn test_subscription_from_unknown_user_is_not_found() {
        let (storage, _temp_dir) = create_temp_storage().await;
        let author = insert_user(storage.get_db(), "author").await;

        let err = storage.add_subscription(9999, author).await.unwrap_err();
        assert!(matches!(err, FoodgramError::NotFound(_)));
        assert_eq!(err.message(), "User 9999 not found");
        assert!(storage.user_exists(author).await.unwrap());
        assert!(!storage.user_exists(9999).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_author() {
        let (storage, _temp_dir) = create_temp_storage().await;
        assert!(storage.author_summary(999, None).await.unwrap().is_none());
    }
}

#[cfg(test)]
mod ingredient_import_tests {
    use super::*;

    #[tokio::test]
    async fn test_import_skips_existing_pairs() {
        let (storage, _temp_dir) = create_temp_storage().await;

        let first = vec![ingredient("salt", "g"), ingredient("milk", "ml")];
        assert_eq!(storage.import_ingredients(&first).await.unwrap(), 2);

        // 同名不同单位算不同配料
        let second = vec![
            ingredient("salt", "g"),
            ingredient("salt", "pinch"),
            ingredient("eggs", "pcs"),
        ];
        assert_eq!(storage.import_ingredients(&second).await.unwrap(), 2);

        assert_eq!(storage.import_ingredients(&first).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_import_empty() {
        let (storage, _temp_dir) = create_temp_storage().await;
        assert_eq!(storage.import_ingredients(&[]).await.unwrap(), 0);
    }
}
