pub mod favorite;
pub mod ingredient;
pub mod recipe;
pub mod recipe_ingredient;
pub mod shopping_cart;
pub mod short_link;
pub mod subscription;
pub mod user;

pub use favorite::Entity as FavoriteEntity;
pub use ingredient::Entity as IngredientEntity;
pub use recipe::Entity as RecipeEntity;
pub use recipe_ingredient::Entity as RecipeIngredientEntity;
pub use shopping_cart::Entity as ShoppingCartEntity;
pub use short_link::Entity as ShortLinkEntity;
pub use subscription::Entity as SubscriptionEntity;
pub use user::Entity as UserEntity;
