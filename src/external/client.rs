use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use url::Url;

use super::error::FetchError;
use super::MovieSource;
use crate::config::{AppConfig, ConfigError};
use crate::models::{MovieRecord, QueryParameters};

/// 电影列表接口路径
pub const MOVIES_PATH: &str = "api/movies";

/// 电影 API 客户端
#[derive(Clone)]
pub struct MovieApiClient {
    client: Client,
    base_url: Url,
}

impl MovieApiClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// 按配置创建客户端（超时等）
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 构建带查询参数的请求 URL
    pub fn movies_url(&self, query: &QueryParameters) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}/{}", url.path().trim_end_matches('/'), MOVIES_PATH);
        url.set_path(&path);
        if query.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&query.to_query_string()));
        }
        url
    }

    /// 获取电影列表
    pub async fn get_movies(&self, query: &QueryParameters) -> Result<Vec<MovieRecord>, FetchError> {
        let url = self.movies_url(query);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), &e).with_status(status.as_u16()))?;

        if !status.is_success() {
            return Err(FetchError::new(url.as_str(), format!("Movie API error: {}", status))
                .with_status(status.as_u16())
                .with_body(&body));
        }

        let movies: Vec<MovieRecord> = serde_json::from_str(&body).map_err(|e| {
            FetchError::new(url.as_str(), format!("Invalid response body: {}", e))
                .with_status(status.as_u16())
                .with_body(&body)
        })?;

        tracing::debug!("Fetched {} movies from {}", movies.len(), url);
        Ok(movies)
    }
}

#[async_trait::async_trait]
impl MovieSource for MovieApiClient {
    async fn fetch_movies(&self, query: &QueryParameters) -> Result<Vec<MovieRecord>, FetchError> {
        self.get_movies(query).await
    }
}
