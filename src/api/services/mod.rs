pub mod error_code;
pub mod health;
pub mod helpers;
pub mod identity;
pub mod links;
pub mod recipes;
pub mod users;

use std::sync::Arc;

use actix_web::web;

use crate::config::StaticConfig;
use crate::errors::Result;
use crate::services::{CartService, ShoppingListBuilder, ShortLinkService, SubscriptionService};
use crate::storage::{SeaOrmStorage, ShortLinkStore};

pub use error_code::ErrorCode;
pub use health::{HealthService, health_routes};
pub use helpers::ApiError;
pub use identity::CurrentUser;
pub use links::redirect_routes;
pub use recipes::recipes_routes;
pub use users::users_routes;

/// Request-independent settings read by the handlers.
#[derive(Clone, Debug)]
pub struct ApiSettings {
    pub user_header: String,
    pub public_base_url: Option<String>,
    pub redirect_prefix: String,
    pub shopping_list_file: String,
}

impl ApiSettings {
    pub fn from_config(config: &StaticConfig) -> Self {
        Self {
            user_header: config.auth.user_header.clone(),
            public_base_url: config.server.public_base_url.clone(),
            redirect_prefix: config.short_link.path_prefix.clone(),
            shopping_list_file: config.shopping_list.file_name.clone(),
        }
    }
}

/// Everything the handlers need, shared by all workers.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<SeaOrmStorage>,
    pub short_links: Arc<ShortLinkService>,
    pub cart: CartService,
    pub subscriptions: SubscriptionService,
    pub shopping_list: ShoppingListBuilder,
    pub settings: ApiSettings,
}

impl AppState {
    pub fn new(storage: Arc<SeaOrmStorage>, config: &StaticConfig) -> Result<Self> {
        let store: Arc<dyn ShortLinkStore> = storage.clone();
        Ok(Self {
            short_links: Arc::new(ShortLinkService::new(store, &config.short_link)?),
            cart: CartService::new(storage.clone()),
            subscriptions: SubscriptionService::new(storage.clone()),
            shopping_list: ShoppingListBuilder::new(config.shopping_list.merge_policy),
            settings: ApiSettings::from_config(config),
            storage,
        })
    }
}

/// API 路由 `/api`
pub fn api_routes() -> actix_web::Scope {
    web::scope("/api")
        .service(recipes_routes())
        .service(users_routes())
}

/// Register shared state and every route on an app.
pub fn configure_app(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::new(state.storage.clone()))
        .app_data(web::Data::new(state.short_links.clone()))
        .app_data(web::Data::new(state.cart.clone()))
        .app_data(web::Data::new(state.subscriptions.clone()))
        .app_data(web::Data::new(state.shopping_list))
        .app_data(web::Data::new(state.settings.clone()))
        .service(health_routes())
        .service(api_routes())
        .service(redirect_routes(&state.settings.redirect_prefix));
}
