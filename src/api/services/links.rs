//! Short link endpoints
//!
//! - `GET /api/recipes/{id}/get-link/` returns the absolute short URL of a recipe
//! - `GET|HEAD {prefix}{token}/` redirects to the aliased path

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Serialize;
use tracing::{debug, error, trace};

use crate::errors::FoodgramError;
use crate::services::{CartService, ShortLinkService, recipe_origin};

use super::ApiSettings;
use super::helpers::{error_from_foodgram, json_response};

#[derive(Serialize, Debug)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

/// Scheme and host for absolute links.
///
/// `server.public_base_url` wins; otherwise the request's connection info.
fn base_url(req: &HttpRequest, settings: &ApiSettings) -> String {
    match settings.public_base_url.as_deref() {
        Some(base) if !base.is_empty() => base.trim_end_matches('/').to_string(),
        _ => {
            let info = req.connection_info();
            format!("{}://{}", info.scheme(), info.host())
        }
    }
}

pub async fn get_link(
    req: HttpRequest,
    path: web::Path<i32>,
    cart: web::Data<CartService>,
    links: web::Data<Arc<ShortLinkService>>,
    settings: web::Data<ApiSettings>,
) -> impl Responder {
    let recipe_id = path.into_inner();

    let result = async {
        if !cart.recipe_exists(recipe_id).await? {
            return Err(FoodgramError::not_found(format!(
                "Recipe {} not found",
                recipe_id
            )));
        }
        links.get_or_create_alias(&recipe_origin(recipe_id)).await
    }
    .await;

    match result {
        Ok(token) => {
            let short_link = format!("{}{}", base_url(&req, &settings), links.short_path(&token));
            trace!("Short link for recipe {}: {}", recipe_id, short_link);
            json_response(StatusCode::OK, &ShortLinkResponse { short_link })
        }
        Err(e) => error_from_foodgram(&e),
    }
}

pub async fn redirect(
    path: web::Path<String>,
    links: web::Data<Arc<ShortLinkService>>,
) -> impl Responder {
    let token = path.into_inner();

    match links.resolve_alias(&token).await {
        Ok(origin) => {
            debug!("Redirecting {} -> {}", token, origin);
            HttpResponse::Found()
                .insert_header(("Location", origin))
                .finish()
        }
        Err(FoodgramError::NotFound(_)) => not_found_response(),
        Err(e) => {
            error!("Short link lookup failed: {}", e);
            HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
                .insert_header(("Content-Type", "text/html; charset=utf-8"))
                .body("Internal Server Error")
        }
    }
}

#[inline]
fn not_found_response() -> HttpResponse {
    HttpResponse::build(StatusCode::NOT_FOUND)
        .insert_header(("Content-Type", "text/html; charset=utf-8"))
        .insert_header(("Cache-Control", "public, max-age=60"))
        .body("Not Found")
}

/// 短链接跳转路由，`prefix` 形如 `/s/`
pub fn redirect_routes(prefix: &str) -> actix_web::Scope {
    let scope = prefix.trim_end_matches('/');
    web::scope(scope)
        .route("/{token}/", web::get().to(redirect))
        .route("/{token}/", web::head().to(redirect))
        .route("/{token}", web::get().to(redirect))
        .route("/{token}", web::head().to(redirect))
}
