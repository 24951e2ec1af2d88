use serde::{Deserialize, Serialize};

use super::filter::FilterError;

/// 外部 API 返回的单条电影记录
///
/// 本程序只读取并展示，响应中的其他字段会被忽略
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub genre: String,
    pub rating: f64,
    pub year: i64,
}

impl MovieRecord {
    /// 卡片上显示的评分（保留一位小数）
    ///
    /// 先按"四舍五入"取整再格式化，`{:.1}` 对 x.x5 会舍入到偶数
    pub fn display_rating(&self) -> String {
        format!("{:.1}", (self.rating * 10.0).round() / 10.0)
    }
}

/// 类型筛选，`All` 表示不限制
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    #[default]
    All,
    Action,
    Comedy,
    Drama,
    Horror,
    Romance,
}

impl Genre {
    /// 下拉框中的全部选项（按显示顺序）
    pub const OPTIONS: [Genre; 6] = [
        Genre::All,
        Genre::Action,
        Genre::Comedy,
        Genre::Drama,
        Genre::Horror,
        Genre::Romance,
    ];

    /// 查询参数中的值，`All` 对应空字符串
    pub fn as_param(&self) -> &'static str {
        match self {
            Genre::All => "",
            Genre::Action => "Action",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Horror => "Horror",
            Genre::Romance => "Romance",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Genre::All => "All",
            other => other.as_param(),
        }
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Genre {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "All" => Ok(Genre::All),
            "Action" => Ok(Genre::Action),
            "Comedy" => Ok(Genre::Comedy),
            "Drama" => Ok(Genre::Drama),
            "Horror" => Ok(Genre::Horror),
            "Romance" => Ok(Genre::Romance),
            other => Err(FilterError::InvalidGenre(other.to_string())),
        }
    }
}

/// 每页条数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const OPTIONS: [PageSize; 4] = [
        PageSize::Ten,
        PageSize::TwentyFive,
        PageSize::Fifty,
        PageSize::Hundred,
    ];

    pub fn value(&self) -> u32 {
        match self {
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl std::str::FromStr for PageSize {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "10" => Ok(PageSize::Ten),
            "25" => Ok(PageSize::TwentyFive),
            "50" => Ok(PageSize::Fifty),
            "100" => Ok(PageSize::Hundred),
            other => Err(FilterError::InvalidPageSize(other.to_string())),
        }
    }
}
