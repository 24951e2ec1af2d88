// 响应缓存
//
// 按查询字符串缓存电影列表，命中时先展示缓存数据，同时仍然发起重新验证请求

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AppConfig;
use crate::models::MovieRecord;

#[derive(Clone)]
pub struct ResponseCache {
    cache: Cache<String, Vec<MovieRecord>>,
}

impl ResponseCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// 配置中未开启缓存时返回 `None`
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        config
            .cache_ttl
            .map(|ttl| Self::new(config.cache_capacity, ttl))
    }

    pub async fn get(&self, query: &str) -> Option<Vec<MovieRecord>> {
        self.cache.get(query).await
    }

    pub async fn insert(&self, query: &str, movies: Vec<MovieRecord>) {
        self.cache.insert(query.to_string(), movies).await;
    }

    pub async fn invalidate(&self, query: &str) {
        self.cache.invalidate(query).await;
    }

    /// 缓存统计（条目数为近似值）
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.cache.entry_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entry_count: u64,
}
