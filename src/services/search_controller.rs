// 搜索控制器
//
// 持有当前筛选状态，在查询字符串变化时发起请求。
// 每个查询对应一个可取消的任务，新查询会中止旧任务，
// 旧任务即使已经完成，其结果也会因代数不匹配而被丢弃

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::cache::ResponseCache;
use crate::external::{FetchError, MovieSource};
use crate::models::{FilterAction, FilterError, FilterState, MovieRecord, QueryParameters};

/// 数据请求的状态，三个分支互斥
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    /// 尚未发起请求
    #[default]
    Idle,
    /// 请求进行中且没有可展示的数据
    Loading,
    Failed(FetchError),
    Loaded(Vec<MovieRecord>),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn movies(&self) -> Option<&[MovieRecord]> {
        match self {
            FetchState::Loaded(movies) => Some(movies),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// 某一时刻对外可见的请求状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    /// 该状态对应的查询字符串
    pub query: String,
    /// 请求代数，每次发起新查询加一
    pub generation: u64,
    pub state: FetchState,
}

struct InFlight {
    query: String,
    handle: JoinHandle<()>,
}

pub struct SearchController {
    source: Arc<dyn MovieSource>,
    cache: Option<ResponseCache>,
    filters: FilterState,
    generation: u64,
    current: Option<InFlight>,
    state_tx: Arc<watch::Sender<SearchSnapshot>>,
}

impl SearchController {
    pub fn new(source: Arc<dyn MovieSource>, cache: Option<ResponseCache>) -> Self {
        let (state_tx, _) = watch::channel(SearchSnapshot::default());
        Self {
            source,
            cache,
            filters: FilterState::default(),
            generation: 0,
            current: None,
            state_tx: Arc::new(state_tx),
        }
    }

    /// 订阅请求状态变化
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.state_tx.subscribe()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn query(&self) -> QueryParameters {
        QueryParameters::from_filters(&self.filters)
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.state_tx.borrow().clone()
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    /// 页面加载：按默认筛选发起第一次请求
    pub async fn start(&mut self) {
        self.refresh().await;
    }

    /// 按字段名修改筛选值，成功后按需重新请求
    pub async fn set_field(&mut self, name: &str, value: &str) -> Result<(), FilterError> {
        let next = self.filters.set_field(name, value)?;
        self.replace_filters(next).await;
        Ok(())
    }

    pub async fn dispatch(&mut self, action: FilterAction) {
        let next = self.filters.apply(action);
        self.replace_filters(next).await;
    }

    async fn replace_filters(&mut self, next: FilterState) {
        if next != self.filters {
            tracing::debug!("Filters changed: {:?}", next);
            self.filters = next;
        }
        self.refresh().await;
    }

    /// 查询字符串变化时发起新请求，未变化时什么都不做
    async fn refresh(&mut self) {
        let query = self.query();
        let key = query.to_query_string();

        if let Some(current) = &self.current {
            if current.query == key {
                return;
            }
        }

        if let Some(previous) = self.current.take() {
            if !previous.handle.is_finished() {
                tracing::debug!("Cancelling superseded request: {}", previous.query);
            }
            previous.handle.abort();
        }

        self.generation += 1;
        let generation = self.generation;

        let initial = match &self.cache {
            Some(cache) => match cache.get(&key).await {
                Some(movies) => {
                    tracing::debug!("Cache hit for query: {}", key);
                    FetchState::Loaded(movies)
                }
                None => FetchState::Loading,
            },
            None => FetchState::Loading,
        };

        self.state_tx.send_replace(SearchSnapshot {
            query: key.clone(),
            generation,
            state: initial,
        });

        let source = Arc::clone(&self.source);
        let cache = self.cache.clone();
        let state_tx = Arc::clone(&self.state_tx);
        let task_key = key.clone();

        let handle = tokio::spawn(async move {
            let state = match source.fetch_movies(&query).await {
                Ok(movies) => {
                    if let Some(cache) = &cache {
                        cache.insert(&task_key, movies.clone()).await;
                    }
                    FetchState::Loaded(movies)
                }
                Err(err) => {
                    tracing::error!("Movie request failed: {}", err);
                    // 重新验证失败后不再用旧数据应答该查询
                    if let Some(cache) = &cache {
                        cache.invalidate(&task_key).await;
                    }
                    FetchState::Failed(err)
                }
            };

            publish(&state_tx, generation, state);
        });

        tracing::info!("Searching movies: {}", key);
        self.current = Some(InFlight { query: key, handle });
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        if let Some(current) = self.current.take() {
            current.handle.abort();
        }
    }
}

/// 只有代数仍是最新时才写入结果
///
/// 比较和写入在同一把锁内完成，过期结果不会覆盖新查询的状态
fn publish(state_tx: &watch::Sender<SearchSnapshot>, generation: u64, state: FetchState) -> bool {
    let published = state_tx.send_if_modified(|snapshot| {
        if snapshot.generation != generation {
            return false;
        }
        snapshot.state = state;
        true
    });

    if !published {
        tracing::debug!("Discarding stale result for generation {}", generation);
    }
    published
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    fn movie(title: &str, rating: f64) -> MovieRecord {
        MovieRecord {
            title: title.to_string(),
            genre: "Drama".to_string(),
            rating,
            year: 2010,
        }
    }

    /// 按查询字符串返回预设结果，可为某些查询设置延迟
    #[derive(Default)]
    struct StubSource {
        responses: HashMap<String, Result<Vec<MovieRecord>, FetchError>>,
        delays: HashMap<String, Duration>,
        calls: Mutex<Vec<String>>,
    }

    impl StubSource {
        fn respond(mut self, query: &str, result: Result<Vec<MovieRecord>, FetchError>) -> Self {
            self.responses.insert(query.to_string(), result);
            self
        }

        fn delay(mut self, query: &str, delay: Duration) -> Self {
            self.delays.insert(query.to_string(), delay);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MovieSource for StubSource {
        async fn fetch_movies(
            &self,
            query: &QueryParameters,
        ) -> Result<Vec<MovieRecord>, FetchError> {
            let key = query.to_query_string();
            self.calls.lock().unwrap().push(key.clone());
            if let Some(delay) = self.delays.get(&key) {
                tokio::time::sleep(*delay).await;
            }
            self.responses
                .get(&key)
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    async fn settled(rx: &mut watch::Receiver<SearchSnapshot>) -> SearchSnapshot {
        rx.wait_for(|s| !matches!(s.state, FetchState::Idle | FetchState::Loading))
            .await
            .unwrap()
            .clone()
    }

    #[tokio::test]
    async fn test_start_fetches_default_query() {
        let source = Arc::new(
            StubSource::default().respond("page=0&pageSize=10", Ok(vec![movie("X", 8.333)])),
        );
        let mut controller = SearchController::new(source.clone(), None);
        let mut rx = controller.subscribe();

        controller.start().await;
        let snapshot = settled(&mut rx).await;

        assert_eq!(snapshot.query, "page=0&pageSize=10");
        assert_eq!(snapshot.state.movies().unwrap().len(), 1);
        assert_eq!(source.calls(), vec!["page=0&pageSize=10".to_string()]);
    }

    #[tokio::test]
    async fn test_loading_before_result() {
        let source = Arc::new(
            StubSource::default().delay("page=0&pageSize=10", Duration::from_millis(200)),
        );
        let mut controller = SearchController::new(source, None);

        controller.start().await;
        assert!(controller.snapshot().state.is_loading());
    }

    #[tokio::test]
    async fn test_unchanged_query_is_not_refetched() {
        let source = Arc::new(StubSource::default());
        let mut controller = SearchController::new(source.clone(), None);
        let mut rx = controller.subscribe();

        controller.start().await;
        settled(&mut rx).await;

        // 文本清空前后查询字符串相同
        controller.set_field("title", "").await.unwrap();
        controller.dispatch(FilterAction::PrevPage).await;
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_field_keeps_state() {
        let source = Arc::new(StubSource::default());
        let mut controller = SearchController::new(source.clone(), None);
        let mut rx = controller.subscribe();

        controller.start().await;
        settled(&mut rx).await;
        let before = controller.filters().clone();
        assert!(controller.set_field("genre", "Western").await.is_err());
        assert_eq!(controller.filters(), &before);
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let slow = "page=0&pageSize=10&title=old";
        let fast = "page=0&pageSize=10&title=new";
        let source = Arc::new(
            StubSource::default()
                .respond(slow, Ok(vec![movie("Old", 1.0)]))
                .delay(slow, Duration::from_millis(300))
                .respond(fast, Ok(vec![movie("New", 9.0)])),
        );
        let mut controller = SearchController::new(source, None);
        let mut rx = controller.subscribe();

        controller.set_field("title", "old").await.unwrap();
        controller.set_field("title", "new").await.unwrap();

        let snapshot = settled(&mut rx).await;
        assert_eq!(snapshot.query, fast);
        assert_eq!(snapshot.state.movies().unwrap()[0].title, "New");

        // 慢请求已被取消，状态不会再变回旧结果
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(controller.snapshot().state.movies().unwrap()[0].title, "New");
    }

    #[test]
    fn test_publish_ignores_old_generation() {
        let (tx, rx) = watch::channel(SearchSnapshot {
            query: "b".to_string(),
            generation: 2,
            state: FetchState::Loading,
        });

        assert!(!publish(&tx, 1, FetchState::Loaded(vec![movie("Old", 1.0)])));
        assert!(rx.borrow().state.is_loading());

        assert!(publish(&tx, 2, FetchState::Loaded(vec![movie("New", 9.0)])));
        assert_eq!(rx.borrow().state.movies().unwrap()[0].title, "New");
    }

    #[tokio::test]
    async fn test_failure_replaces_previous_data() {
        let failing = "page=0&pageSize=10&genre=Horror";
        let source = Arc::new(StubSource::default().respond(
            failing,
            Err(FetchError::new("http://test/api/movies", "Movie API error: 500").with_status(500)),
        ));
        let mut controller = SearchController::new(source, None);
        let mut rx = controller.subscribe();

        controller.start().await;
        assert!(settled(&mut rx).await.state.movies().is_some());

        controller.set_field("genre", "Horror").await.unwrap();
        let snapshot = settled(&mut rx).await;
        assert_eq!(snapshot.state.error().unwrap().status, Some(500));
        assert!(snapshot.state.movies().is_none());
    }

    #[tokio::test]
    async fn test_cache_hit_shows_data_and_revalidates() {
        let source = Arc::new(
            StubSource::default()
                .respond("page=0&pageSize=10", Ok(vec![movie("A", 5.0)]))
                .delay("page=0&pageSize=10", Duration::from_millis(100)),
        );
        let cache = ResponseCache::new(8, Duration::from_secs(60));
        cache.insert("page=0&pageSize=10", vec![movie("Cached", 5.0)]).await;

        let mut controller = SearchController::new(source.clone(), Some(cache));
        let mut rx = controller.subscribe();

        controller.start().await;
        assert_eq!(
            controller.snapshot().state.movies().unwrap()[0].title,
            "Cached"
        );

        let snapshot = rx
            .wait_for(|s| s.state.movies().map(|m| m[0].title == "A").unwrap_or(false))
            .await
            .unwrap()
            .clone();
        assert_eq!(snapshot.generation, 1);
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_revalidation_drops_cached_entry() {
        let query = "page=0&pageSize=10";
        let source = Arc::new(StubSource::default().respond(
            query,
            Err(FetchError::new("http://test/api/movies", "Movie API error: 503").with_status(503)),
        ));
        let cache = ResponseCache::new(8, Duration::from_secs(60));
        cache.insert(query, vec![movie("Cached", 5.0)]).await;

        let mut controller = SearchController::new(source, Some(cache.clone()));
        let mut rx = controller.subscribe();

        controller.start().await;
        // 命中缓存时先展示缓存数据
        assert_eq!(
            controller.snapshot().state.movies().unwrap()[0].title,
            "Cached"
        );

        let snapshot = rx
            .wait_for(|s| s.state.error().is_some())
            .await
            .unwrap()
            .clone();
        assert_eq!(snapshot.state.error().unwrap().status, Some(503));
        assert!(cache.get(query).await.is_none());
    }
}
