// 电影搜索客户端库
//
// 本库提供电影搜索页面的核心功能，包括：
// - 筛选状态与查询参数
// - 外部电影 API 客户端
// - 请求控制与响应缓存
// - 终端页面渲染

pub mod config;
pub mod external;
pub mod models;
pub mod services;
pub mod ui;

pub use config::AppConfig;
pub use external::{FetchError, MovieApiClient, MovieSource};
pub use models::{FilterState, MovieRecord, QueryParameters};
pub use services::{FetchState, SearchController};
