//! Recipe endpoints: cart, favorites and the shopping list download

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use tracing::info;

use crate::services::{CartService, ShoppingListBuilder};
use crate::storage::RecipeRelation;

use super::ApiSettings;
use super::helpers::{api_result, empty_result, error_from_foodgram};
use super::identity::CurrentUser;
use super::links::get_link;

async fn add_relation(
    user: CurrentUser,
    recipe_id: i32,
    cart: &CartService,
    relation: RecipeRelation,
) -> HttpResponse {
    api_result(
        StatusCode::CREATED,
        cart.add_relation(user.id, recipe_id, relation).await,
    )
}

async fn remove_relation(
    user: CurrentUser,
    recipe_id: i32,
    cart: &CartService,
    relation: RecipeRelation,
) -> HttpResponse {
    empty_result(cart.remove_relation(user.id, recipe_id, relation).await)
}

pub async fn add_to_cart(
    user: CurrentUser,
    path: web::Path<i32>,
    cart: web::Data<CartService>,
) -> impl Responder {
    add_relation(user, path.into_inner(), &cart, RecipeRelation::ShoppingCart).await
}

pub async fn remove_from_cart(
    user: CurrentUser,
    path: web::Path<i32>,
    cart: web::Data<CartService>,
) -> impl Responder {
    remove_relation(user, path.into_inner(), &cart, RecipeRelation::ShoppingCart).await
}

pub async fn add_favorite(
    user: CurrentUser,
    path: web::Path<i32>,
    cart: web::Data<CartService>,
) -> impl Responder {
    add_relation(user, path.into_inner(), &cart, RecipeRelation::Favorite).await
}

pub async fn remove_favorite(
    user: CurrentUser,
    path: web::Path<i32>,
    cart: web::Data<CartService>,
) -> impl Responder {
    remove_relation(user, path.into_inner(), &cart, RecipeRelation::Favorite).await
}

pub async fn download_shopping_cart(
    user: CurrentUser,
    cart: web::Data<CartService>,
    builder: web::Data<ShoppingListBuilder>,
    settings: web::Data<ApiSettings>,
) -> impl Responder {
    let result = match cart.cart_dishes(user.id).await {
        Ok(dishes) => builder.build(&dishes).map(|pdf| (dishes.len(), pdf)),
        Err(e) => Err(e),
    };

    match result {
        Ok((dish_count, pdf)) => {
            info!(
                "Shopping list for user {}: {} dishes, {} bytes",
                user.id,
                dish_count,
                pdf.len()
            );
            HttpResponse::Ok()
                .insert_header(("Content-Type", "application/pdf"))
                .insert_header((
                    "Content-Disposition",
                    format!(
                        "attachment; filename=\"{}.pdf\"",
                        settings.shopping_list_file
                    ),
                ))
                .body(pdf)
        }
        Err(e) => error_from_foodgram(&e),
    }
}

/// 菜谱路由 `/recipes`
pub fn recipes_routes() -> actix_web::Scope {
    web::scope("/recipes")
        .route(
            "/download_shopping_cart/",
            web::get().to(download_shopping_cart),
        )
        .route("/{id}/get-link/", web::get().to(get_link))
        .route("/{id}/shopping_cart/", web::post().to(add_to_cart))
        .route("/{id}/shopping_cart/", web::delete().to(remove_from_cart))
        .route("/{id}/favorite/", web::post().to(add_favorite))
        .route("/{id}/favorite/", web::delete().to(remove_favorite))
}
