pub mod cache;
pub mod search_controller;

pub use cache::{CacheStats, ResponseCache};
pub use search_controller::{FetchState, SearchController, SearchSnapshot};
