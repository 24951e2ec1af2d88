use serde::Serialize;

use super::filter::{format_number, FilterField, FilterState};
use super::movie::Genre;

/// 实际发送给 API 的查询参数
///
/// 由 [`FilterState`] 纯函数派生，不单独存储。未设置或为空的字段被省略，
/// 其余字段转为字符串，顺序固定为 page, pageSize, title, genre, rating, year, director, actor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryParameters {
    params: Vec<(String, String)>,
}

impl QueryParameters {
    pub fn from_filters(filters: &FilterState) -> Self {
        let params = FilterField::ALL
            .iter()
            .filter_map(|field| {
                param_value(filters, *field).map(|value| (field.as_str().to_string(), value))
            })
            .collect();

        Self { params }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// URL 编码后的查询字符串，同时作为请求任务和缓存的键
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl From<&FilterState> for QueryParameters {
    fn from(filters: &FilterState) -> Self {
        Self::from_filters(filters)
    }
}

impl std::fmt::Display for QueryParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_query_string())
    }
}

/// 单个字段的参数值，`None` 表示该字段不约束查询
fn param_value(filters: &FilterState, field: FilterField) -> Option<String> {
    match field {
        // 页码总是发送（包括第 0 页）
        FilterField::Page => Some(filters.page.to_string()),
        FilterField::PageSize => Some(filters.page_size.to_string()),
        FilterField::Title => non_empty(&filters.title),
        FilterField::Genre => match filters.genre {
            Genre::All => None,
            genre => Some(genre.as_param().to_string()),
        },
        // 最低评分为 0 时不构成约束
        FilterField::Rating => filters
            .rating
            .filter(|rating| *rating > 0.0)
            .map(format_number),
        FilterField::Year => filters.year.map(|year| year.to_string()),
        FilterField::Director => non_empty(&filters.director),
        FilterField::Actor => non_empty(&filters.actor),
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
