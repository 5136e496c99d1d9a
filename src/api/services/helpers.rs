//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use tracing::{debug, error};

use crate::errors::FoodgramError;

use super::error_code::ErrorCode;

/// Error body: `{"code": 1004, "message": "..."}`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub code: i32,
    pub message: String,
}

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(body)
}

/// 构建错误响应
pub fn error_response(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    json_response(
        status,
        &ApiError {
            code: code as i32,
            message: message.to_string(),
        },
    )
}

/// 从 FoodgramError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
///
/// 客户端错误只记 debug 日志。
pub fn error_from_foodgram(err: &FoodgramError) -> HttpResponse {
    if err.is_client_error() {
        debug!("Request rejected: {}", err);
    } else {
        error!("Request failed: {}", err.format_simple());
    }
    error_response(err.http_status(), ErrorCode::from(err), err.message())
}

/// 统一 Result → HttpResponse 转换
pub fn api_result<T: Serialize>(status: StatusCode, result: Result<T, FoodgramError>) -> HttpResponse {
    match result {
        Ok(data) => json_response(status, &data),
        Err(e) => error_from_foodgram(&e),
    }
}

/// 204，或错误
pub fn empty_result(result: Result<(), FoodgramError>) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_from_foodgram(&e),
    }
}
