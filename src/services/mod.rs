//! Service layer for business logic
//!
//! Shared by the HTTP handlers and the CLI.

mod cart;
pub mod shopping_list;
pub mod short_link;
mod subscription;

pub use cart::CartService;
pub use shopping_list::{DishSection, ShoppingList, ShoppingListBuilder};
pub use short_link::{
    ShortLinkService, ThreadRngSource, TokenPolicy, TokenSource, recipe_origin,
};
pub use subscription::SubscriptionService;
