use serde::{Deserialize, Serialize};

/// Default short-token alphabet: ASCII letters and digits without `I` and `l`.
///
/// Changing it does not invalidate already-issued tokens, but it changes
/// which tokens can be issued from now on.
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHJKLMNOPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz1234567890";
pub const DEFAULT_TOKEN_LENGTH: usize = 6;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// How the consolidated summary of a shopping list treats repeated
/// `(name, measurement_unit)` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Keep the first occurrence's amount, drop the rest.
    #[default]
    FirstSeen,
    /// Add the amounts of every occurrence.
    Sum,
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstSeen => write!(f, "first_seen"),
            Self::Sum => write!(f, "sum"),
        }
    }
}

impl std::str::FromStr for MergePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first_seen" => Ok(Self::FirstSeen),
            "sum" => Ok(Self::Sum),
            _ => Err(format!(
                "Invalid merge policy: '{}'. Valid: first_seen, sum",
                s
            )),
        }
    }
}

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 服务器地址、端口、对外地址
/// - database: 数据库连接配置
/// - short_link: 短链接令牌生成规则
/// - shopping_list: 购物清单文档配置
/// - auth: 上游认证层传入的用户标识
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub short_link: ShortLinkConfig,
    #[serde(default)]
    pub shopping_list: ShoppingListConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：FG，分隔符：__
    /// 示例：FG__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or("config.toml");

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 FG，分隔符 __
            .add_source(
                Environment::with_prefix("FG")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// 对外访问地址，用于拼接完整短链接（例如 https://foodgram.example）
    /// 未设置时使用请求的 scheme + host
    #[serde(default)]
    pub public_base_url: Option<String>,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 短链接令牌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortLinkConfig {
    #[serde(default = "default_alphabet")]
    pub alphabet: String,
    #[serde(default = "default_token_length")]
    pub token_length: usize,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// 短链接公开路径前缀，令牌拼接在其后并以 `/` 结尾
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
    /// 已解析令牌的进程内缓存容量
    #[serde(default = "default_resolve_cache_capacity")]
    pub resolve_cache_capacity: u64,
}

/// 购物清单文档配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListConfig {
    /// 下载文件名（不含扩展名）
    #[serde(default = "default_shopping_list_file_name")]
    pub file_name: String,
    #[serde(default)]
    pub merge_policy: MergePolicy,
}

/// 认证配置
///
/// 认证本身由上游完成，这里只读取上游写入的用户 ID 请求头。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_user_header")]
    pub user_header: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8000
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "sqlite://foodgram.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_alphabet() -> String {
    DEFAULT_ALPHABET.to_string()
}

fn default_token_length() -> usize {
    DEFAULT_TOKEN_LENGTH
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_path_prefix() -> String {
    "/s/".to_string()
}

fn default_resolve_cache_capacity() -> u64 {
    10_000
}

fn default_shopping_list_file_name() -> String {
    "shopping_list".to_string()
}

fn default_user_header() -> String {
    "X-User-Id".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            public_base_url: None,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for ShortLinkConfig {
    fn default() -> Self {
        Self {
            alphabet: default_alphabet(),
            token_length: default_token_length(),
            max_attempts: default_max_attempts(),
            path_prefix: default_path_prefix(),
            resolve_cache_capacity: default_resolve_cache_capacity(),
        }
    }
}

impl Default for ShoppingListConfig {
    fn default() -> Self {
        Self {
            file_name: default_shopping_list_file_name(),
            merge_policy: MergePolicy::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_header: default_user_header(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_short_link_settings() {
        let config = StaticConfig::default();
        assert_eq!(config.short_link.alphabet, DEFAULT_ALPHABET);
        assert_eq!(config.short_link.token_length, 6);
        assert_eq!(config.short_link.max_attempts, 100);
        assert_eq!(config.short_link.path_prefix, "/s/");
        assert_eq!(config.shopping_list.file_name, "shopping_list");
        assert_eq!(config.shopping_list.merge_policy, MergePolicy::FirstSeen);
    }

    #[test]
    fn test_default_alphabet_has_no_ambiguous_letters() {
        assert!(!DEFAULT_ALPHABET.contains('I'));
        assert!(!DEFAULT_ALPHABET.contains('l'));
        assert!(DEFAULT_ALPHABET.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_sample_config_round_trips_through_toml() {
        let sample = StaticConfig::generate_sample_config();
        let parsed: StaticConfig = toml::from_str(&sample).expect("sample config must parse");
        assert_eq!(parsed.short_link.token_length, DEFAULT_TOKEN_LENGTH);
        assert_eq!(parsed.auth.user_header, "X-User-Id");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: StaticConfig = toml::from_str(
            r#"
            [short_link]
            token_length = 8

            [shopping_list]
            merge_policy = "sum"
            "#,
        )
        .expect("partial config must parse");
        assert_eq!(parsed.short_link.token_length, 8);
        assert_eq!(parsed.short_link.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(parsed.shopping_list.merge_policy, MergePolicy::Sum);
        assert_eq!(parsed.server.port, 8000);
    }

    #[test]
    fn test_merge_policy_from_str() {
        assert_eq!("first_seen".parse::<MergePolicy>(), Ok(MergePolicy::FirstSeen));
        assert_eq!("SUM".parse::<MergePolicy>(), Ok(MergePolicy::Sum));
        assert!("average".parse::<MergePolicy>().is_err());
    }
}
