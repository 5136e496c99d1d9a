use actix_web::http::StatusCode;
use actix_web::{Responder, web};

use crate::services::SubscriptionService;

use super::helpers::{api_result, empty_result};
use super::identity::CurrentUser;

pub async fn subscribe(
    user: CurrentUser,
    path: web::Path<i32>,
    subscriptions: web::Data<SubscriptionService>,
) -> impl Responder {
    api_result(
        StatusCode::CREATED,
        subscriptions.subscribe(user.id, path.into_inner()).await,
    )
}

pub async fn unsubscribe(
    user: CurrentUser,
    path: web::Path<i32>,
    subscriptions: web::Data<SubscriptionService>,
) -> impl Responder {
    empty_result(subscriptions.unsubscribe(user.id, path.into_inner()).await)
}

/// 用户路由 `/users`
pub fn users_routes() -> actix_web::Scope {
    web::scope("/users")
        .route("/{id}/subscribe/", web::post().to(subscribe))
        .route("/{id}/subscribe/", web::delete().to(unsubscribe))
}
