//! Caller identity
//!
//! Authentication happens upstream. The authenticated user id arrives in a
//! request header whose name is configurable (`auth.user_header`).

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, web};

use crate::config::{AuthConfig, try_get_config};
use crate::errors::FoodgramError;

use super::ApiSettings;
use super::helpers::error_from_foodgram;

/// Authenticated user; a missing or malformed header yields 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
}

impl CurrentUser {
    fn from_header(req: &HttpRequest, header: &str) -> Result<Self, FoodgramError> {
        let raw = req
            .headers()
            .get(header)
            .ok_or_else(|| FoodgramError::unauthorized("Authentication credentials were not provided"))?;

        raw.to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i32>().ok())
            .filter(|id| *id > 0)
            .map(|id| CurrentUser { id })
            .ok_or_else(|| FoodgramError::unauthorized(format!("Invalid {} header", header)))
    }
}

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // 未注册 ApiSettings 时退回全局配置
        let fallback;
        let header = match req.app_data::<web::Data<ApiSettings>>() {
            Some(settings) => settings.user_header.as_str(),
            None => {
                fallback = try_get_config()
                    .map(|config| config.auth.user_header.clone())
                    .unwrap_or_else(|| AuthConfig::default().user_header);
                fallback.as_str()
            }
        };

        ready(Self::from_header(req, header).map_err(|err| {
            let response = error_from_foodgram(&err);
            InternalError::from_response(err, response).into()
        }))
    }
}
