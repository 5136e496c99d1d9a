//! 统一 API 错误码定义

use crate::errors::FoodgramError;

/// API 错误码枚举
///
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 短链接错误
/// - 4000-4099: 文档生成错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    AlreadyExists = 1009,

    // 短链接错误 3000-3099
    ShortLinkNotFound = 3000,
    ShortLinkExhausted = 3010,

    // 文档生成错误 4000-4099
    DocumentBuildFailed = 4006,
}

impl From<&FoodgramError> for ErrorCode {
    fn from(err: &FoodgramError) -> Self {
        match err {
            FoodgramError::Validation(_) => ErrorCode::BadRequest,
            FoodgramError::Unauthorized(_) => ErrorCode::Unauthorized,
            FoodgramError::NotFound(msg) if msg.starts_with("Short link") => {
                ErrorCode::ShortLinkNotFound
            }
            FoodgramError::NotFound(_) => ErrorCode::NotFound,
            FoodgramError::AlreadyExists(_) => ErrorCode::AlreadyExists,
            FoodgramError::GenerationExhausted(_) => ErrorCode::ShortLinkExhausted,
            FoodgramError::DocumentBuild(_) => ErrorCode::DocumentBuildFailed,
            FoodgramError::Config(_)
            | FoodgramError::DatabaseConfig(_)
            | FoodgramError::DatabaseConnection(_)
            | FoodgramError::DatabaseOperation(_)
            | FoodgramError::FileOperation(_)
            | FoodgramError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            ErrorCode::from(&FoodgramError::validation("x")),
            ErrorCode::BadRequest
        );
        assert_eq!(
            ErrorCode::from(&FoodgramError::not_found("Short link 'abc' not found")),
            ErrorCode::ShortLinkNotFound
        );
        assert_eq!(
            ErrorCode::from(&FoodgramError::not_found("Recipe 1 not found")),
            ErrorCode::NotFound
        );
        assert_eq!(
            ErrorCode::from(&FoodgramError::generation_exhausted(1, 6, 60)) as i32,
            3010
        );
    }
}
