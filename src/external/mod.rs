pub mod client;
pub mod error;

use async_trait::async_trait;

pub use client::MovieApiClient;
pub use error::FetchError;

use crate::models::{MovieRecord, QueryParameters};

/// 电影数据来源
///
/// 控制器只依赖该 trait，生产环境使用 [`MovieApiClient`]
#[async_trait]
pub trait MovieSource: Send + Sync + 'static {
    async fn fetch_movies(&self, query: &QueryParameters) -> Result<Vec<MovieRecord>, FetchError>;
}
