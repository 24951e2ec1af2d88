use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::movie::{Genre, PageSize};

/// 评分滑块范围
pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 10.0;
pub const RATING_STEP: f64 = 0.1;

/// 年份滑块范围
pub const YEAR_MIN: i32 = 2000;
pub const YEAR_MAX: i32 = 2024;

/// 筛选输入错误
///
/// 只覆盖输入控件本身会拒绝的值，出错时状态保持不变
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Unknown filter field: {0}")]
    UnknownField(String),

    #[error("Invalid genre: {0} (expected one of All, Action, Comedy, Drama, Horror, Romance)")]
    InvalidGenre(String),

    #[error("Invalid page size: {0} (expected 10, 25, 50 or 100)")]
    InvalidPageSize(String),

    #[error("Invalid page: {0} (must be a non-negative integer)")]
    InvalidPage(String),

    #[error("Invalid rating: {0} (must be a number)")]
    InvalidRating(String),

    #[error("Invalid year: {0} (must be an integer)")]
    InvalidYear(String),
}

/// 可编辑的筛选字段，名称与查询参数一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Page,
    PageSize,
    Title,
    Genre,
    Rating,
    Year,
    Director,
    Actor,
}

impl FilterField {
    /// 查询参数的固定顺序
    pub const ALL: [FilterField; 8] = [
        FilterField::Page,
        FilterField::PageSize,
        FilterField::Title,
        FilterField::Genre,
        FilterField::Rating,
        FilterField::Year,
        FilterField::Director,
        FilterField::Actor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Page => "page",
            FilterField::PageSize => "pageSize",
            FilterField::Title => "title",
            FilterField::Genre => "genre",
            FilterField::Rating => "rating",
            FilterField::Year => "year",
            FilterField::Director => "director",
            FilterField::Actor => "actor",
        }
    }
}

impl std::fmt::Display for FilterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FilterField {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page" => Ok(FilterField::Page),
            "pageSize" | "pagesize" | "page_size" => Ok(FilterField::PageSize),
            "title" => Ok(FilterField::Title),
            "genre" => Ok(FilterField::Genre),
            "rating" => Ok(FilterField::Rating),
            "year" => Ok(FilterField::Year),
            "director" => Ok(FilterField::Director),
            "actor" => Ok(FilterField::Actor),
            other => Err(FilterError::UnknownField(other.to_string())),
        }
    }
}

/// 对筛选状态的一次修改
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    SetPage(u32),
    SetPageSize(PageSize),
    SetTitle(String),
    SetGenre(Genre),
    /// `None` 表示滑块未被触碰
    SetRating(Option<f64>),
    SetYear(Option<i32>),
    SetDirector(String),
    SetActor(String),
    NextPage,
    PrevPage,
    Clear(FilterField),
    Reset,
}

/// 页面上的全部筛选值
///
/// 不可变值，通过 [`FilterState::apply`] 生成新状态。
/// `rating` 和 `year` 采用"是否被设置"模型：未触碰的滑块不参与查询
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub page: u32,
    pub page_size: PageSize,
    pub title: String,
    pub genre: Genre,
    pub rating: Option<f64>,
    pub year: Option<i32>,
    pub director: String,
    pub actor: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: PageSize::Ten,
            title: String::new(),
            genre: Genre::All,
            rating: None,
            year: None,
            director: String::new(),
            actor: String::new(),
        }
    }
}

impl FilterState {
    /// 纯函数 reducer：替换一个字段，其余字段保持不变
    pub fn apply(&self, action: FilterAction) -> FilterState {
        let mut next = self.clone();
        match action {
            FilterAction::SetPage(page) => next.page = page,
            FilterAction::SetPageSize(size) => next.page_size = size,
            FilterAction::SetTitle(title) => next.title = title,
            FilterAction::SetGenre(genre) => next.genre = genre,
            FilterAction::SetRating(rating) => next.rating = rating.map(snap_rating),
            FilterAction::SetYear(year) => next.year = year.map(|y| y.clamp(YEAR_MIN, YEAR_MAX)),
            FilterAction::SetDirector(director) => next.director = director,
            FilterAction::SetActor(actor) => next.actor = actor,
            FilterAction::NextPage => next.page = self.page.saturating_add(1),
            FilterAction::PrevPage => next.page = self.page.saturating_sub(1),
            FilterAction::Clear(field) => {
                let defaults = FilterState::default();
                match field {
                    FilterField::Page => next.page = defaults.page,
                    FilterField::PageSize => next.page_size = defaults.page_size,
                    FilterField::Title => next.title = defaults.title,
                    FilterField::Genre => next.genre = defaults.genre,
                    FilterField::Rating => next.rating = defaults.rating,
                    FilterField::Year => next.year = defaults.year,
                    FilterField::Director => next.director = defaults.director,
                    FilterField::Actor => next.actor = defaults.actor,
                }
            }
            FilterAction::Reset => next = FilterState::default(),
        }
        next
    }

    /// 按字段名设置字段值（输入事件的入口）
    ///
    /// 空值对文本字段表示清空，对滑块表示恢复为未设置
    pub fn set_field(&self, name: &str, value: &str) -> Result<FilterState, FilterError> {
        let field: FilterField = name.trim().parse()?;
        let action = parse_action(field, value)?;
        Ok(self.apply(action))
    }

    pub fn reset(&self) -> FilterState {
        self.apply(FilterAction::Reset)
    }
}

/// 将输入控件的原始字符串转换为 reducer 动作
fn parse_action(field: FilterField, value: &str) -> Result<FilterAction, FilterError> {
    let trimmed = value.trim();
    let action = match field {
        FilterField::Page => {
            if trimmed.is_empty() {
                FilterAction::Clear(FilterField::Page)
            } else {
                let page = trimmed
                    .parse::<u32>()
                    .map_err(|_| FilterError::InvalidPage(value.to_string()))?;
                FilterAction::SetPage(page)
            }
        }
        FilterField::PageSize => FilterAction::SetPageSize(trimmed.parse()?),
        FilterField::Genre => FilterAction::SetGenre(trimmed.parse()?),
        FilterField::Rating => {
            if trimmed.is_empty() {
                FilterAction::SetRating(None)
            } else {
                let rating = trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|r| r.is_finite())
                    .ok_or_else(|| FilterError::InvalidRating(value.to_string()))?;
                FilterAction::SetRating(Some(rating))
            }
        }
        FilterField::Year => {
            if trimmed.is_empty() {
                FilterAction::SetYear(None)
            } else {
                let year = trimmed
                    .parse::<i32>()
                    .map_err(|_| FilterError::InvalidYear(value.to_string()))?;
                FilterAction::SetYear(Some(year))
            }
        }
        // 文本框不做任何校验，原样保存
        FilterField::Title => FilterAction::SetTitle(value.to_string()),
        FilterField::Director => FilterAction::SetDirector(value.to_string()),
        FilterField::Actor => FilterAction::SetActor(value.to_string()),
    };
    Ok(action)
}

/// 评分滑块：限制在 [0, 10] 并对齐到 0.1
fn snap_rating(rating: f64) -> f64 {
    let clamped = rating.clamp(RATING_MIN, RATING_MAX);
    let steps_per_unit = (1.0 / RATING_STEP).round();
    (clamped * steps_per_unit).round() / steps_per_unit
}

/// 数字转字符串，整数不带小数部分（与浏览器的 toString 一致）
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
