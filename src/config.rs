// 运行配置
//
// 从环境变量（以及 .env 文件）读取，非法值回退到默认值并记录警告

use std::time::Duration;
use thiserror::Error;
use url::Url;

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// 外部电影 API 的根地址
    pub api_base_url: Url,
    /// 请求超时，`None` 表示不设超时
    pub request_timeout: Option<Duration>,
    /// 按查询缓存响应的有效期，`None` 表示关闭缓存
    pub cache_ttl: Option<Duration>,
    pub cache_capacity: u64,
}

impl AppConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:5196";
    pub const DEFAULT_CACHE_CAPACITY: u64 = 128;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 通过任意键值来源构建配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("MOVIE_API_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());
        let api_base_url = Url::parse(base_url.trim())
            .map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(api_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(base_url));
        }

        let request_timeout = match parse_u64(&lookup, "MOVIE_API_TIMEOUT_SECS", 0) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        let cache_ttl = match parse_u64(&lookup, "MOVIE_SEARCH_CACHE_TTL_SECS", 0) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        let cache_capacity = match parse_u64(
            &lookup,
            "MOVIE_SEARCH_CACHE_CAPACITY",
            Self::DEFAULT_CACHE_CAPACITY,
        ) {
            0 => Self::DEFAULT_CACHE_CAPACITY,
            capacity => capacity,
        };

        Ok(Self {
            api_base_url,
            request_timeout,
            cache_ttl,
            cache_capacity,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(Self::DEFAULT_BASE_URL).expect("默认 URL 合法"),
            request_timeout: None,
            cache_ttl: None,
            cache_capacity: Self::DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// 读取一个非负整数，缺失或非法时使用默认值
fn parse_u64<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Invalid value for {}: {:?}, using default {}", key, raw, default);
                default
            }
        },
        None => default,
    }
}
