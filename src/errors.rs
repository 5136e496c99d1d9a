use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum FoodgramError {
    Config(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    AlreadyExists(String),
    Unauthorized(String),
    Serialization(String),
    GenerationExhausted(String),
    DocumentBuild(String),
}

impl FoodgramError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            FoodgramError::Config(_) => "E001",
            FoodgramError::DatabaseConfig(_) => "E003",
            FoodgramError::DatabaseConnection(_) => "E004",
            FoodgramError::DatabaseOperation(_) => "E005",
            FoodgramError::FileOperation(_) => "E006",
            FoodgramError::Validation(_) => "E007",
            FoodgramError::NotFound(_) => "E008",
            FoodgramError::Serialization(_) => "E009",
            FoodgramError::AlreadyExists(_) => "E010",
            FoodgramError::Unauthorized(_) => "E011",
            FoodgramError::GenerationExhausted(_) => "E020",
            FoodgramError::DocumentBuild(_) => "E021",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            FoodgramError::Config(_) => "Configuration Error",
            FoodgramError::DatabaseConfig(_) => "Database Configuration Error",
            FoodgramError::DatabaseConnection(_) => "Database Connection Error",
            FoodgramError::DatabaseOperation(_) => "Database Operation Error",
            FoodgramError::FileOperation(_) => "File Operation Error",
            FoodgramError::Validation(_) => "Validation Error",
            FoodgramError::NotFound(_) => "Resource Not Found",
            FoodgramError::AlreadyExists(_) => "Resource Already Exists",
            FoodgramError::Unauthorized(_) => "Unauthorized",
            FoodgramError::Serialization(_) => "Serialization Error",
            FoodgramError::GenerationExhausted(_) => "Short Token Space Exhausted",
            FoodgramError::DocumentBuild(_) => "Document Build Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            FoodgramError::Config(msg)
            | FoodgramError::DatabaseConfig(msg)
            | FoodgramError::DatabaseConnection(msg)
            | FoodgramError::DatabaseOperation(msg)
            | FoodgramError::FileOperation(msg)
            | FoodgramError::Validation(msg)
            | FoodgramError::NotFound(msg)
            | FoodgramError::AlreadyExists(msg)
            | FoodgramError::Unauthorized(msg)
            | FoodgramError::Serialization(msg)
            | FoodgramError::GenerationExhausted(msg)
            | FoodgramError::DocumentBuild(msg) => msg,
        }
    }

    /// HTTP 状态码映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            FoodgramError::Validation(_) | FoodgramError::AlreadyExists(_) => {
                StatusCode::BAD_REQUEST
            }
            FoodgramError::NotFound(_) => StatusCode::NOT_FOUND,
            FoodgramError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            FoodgramError::Config(_)
            | FoodgramError::DatabaseConfig(_)
            | FoodgramError::DatabaseConnection(_)
            | FoodgramError::DatabaseOperation(_)
            | FoodgramError::FileOperation(_)
            | FoodgramError::Serialization(_)
            | FoodgramError::GenerationExhausted(_)
            | FoodgramError::DocumentBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-side failures are expected traffic and must not be logged as system errors.
    pub fn is_client_error(&self) -> bool {
        self.http_status().is_client_error()
    }

    /// 格式化为彩色输出（用于终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for FoodgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for FoodgramError {}

// 便捷的构造函数
impl FoodgramError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        FoodgramError::Config(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        FoodgramError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        FoodgramError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        FoodgramError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        FoodgramError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        FoodgramError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        FoodgramError::NotFound(msg.into())
    }

    pub fn already_exists<T: Into<String>>(msg: T) -> Self {
        FoodgramError::AlreadyExists(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        FoodgramError::Unauthorized(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        FoodgramError::Serialization(msg.into())
    }

    /// The retry budget of the short-token allocator ran out.
    ///
    /// The message tells the operator which knobs widen the token space.
    pub fn generation_exhausted(attempts: u32, token_length: usize, alphabet_len: usize) -> Self {
        FoodgramError::GenerationExhausted(format!(
            "Could not allocate a unique short token after {} attempts \
             (token_length = {}, alphabet size = {}). Increase short_link.token_length \
             or extend short_link.alphabet.",
            attempts, token_length, alphabet_len
        ))
    }

    pub fn document_build<T: Into<String>>(msg: T) -> Self {
        FoodgramError::DocumentBuild(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for FoodgramError {
    fn from(err: sea_orm::DbErr) -> Self {
        FoodgramError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for FoodgramError {
    fn from(err: std::io::Error) -> Self {
        FoodgramError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for FoodgramError {
    fn from(err: serde_json::Error) -> Self {
        FoodgramError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FoodgramError>;
