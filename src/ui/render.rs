// 页面渲染
//
// 把筛选状态和请求状态渲染为终端文本帧：
// 顶部为输入控件，下方为加载提示、错误输出或电影卡片三者之一

use serde::Serialize;
use std::fmt::Write;

use crate::external::FetchError;
use crate::models::filter::{RATING_MAX, RATING_MIN, RATING_STEP, YEAR_MAX, YEAR_MIN};
use crate::models::{FilterState, Genre, MovieRecord, PageSize};
use crate::services::FetchState;

pub const PAGE_TITLE: &str = "Movie Search & Filters";
pub const LOADING_TEXT: &str = "Loading...";
pub const EMPTY_TEXT: &str = "No movies found.";

const SLIDER_WIDTH: usize = 20;

/// 渲染完整页面
pub fn render_page(filters: &FilterState, state: &FetchState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", PAGE_TITLE);
    let _ = writeln!(out, "{}", "=".repeat(PAGE_TITLE.len()));
    out.push_str(&render_controls(filters));
    out.push('\n');
    out.push_str(&render_results(state));
    out
}

/// 输入控件区域
pub fn render_controls(filters: &FilterState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<16}[{}]", "Search Movies", filters.title);
    let _ = writeln!(out, "{:<16}[{}]", "Search Director", filters.director);
    let _ = writeln!(out, "{:<16}[{}]", "Search Actor", filters.actor);
    let _ = writeln!(
        out,
        "{:<16}{}",
        "Genre",
        render_select(&Genre::OPTIONS, &filters.genre)
    );
    let _ = writeln!(
        out,
        "{:<16}{}",
        "Page size",
        render_select(&PageSize::OPTIONS, &filters.page_size)
    );
    let _ = writeln!(
        out,
        "{:<16}{}",
        "Rating",
        render_slider(
            RATING_MIN,
            RATING_MAX,
            filters.rating,
            filters.rating.map(|r| format!("{:.1}", r)),
        )
    );
    let _ = writeln!(
        out,
        "{:<16}{}",
        "Year",
        render_slider(
            f64::from(YEAR_MIN),
            f64::from(YEAR_MAX),
            filters.year.map(f64::from),
            filters.year.map(|y| y.to_string()),
        )
    );
    let _ = writeln!(out, "{:<16}{}", "Page", filters.page);
    out
}

/// 结果区域：加载、错误、卡片三者互斥
pub fn render_results(state: &FetchState) -> String {
    match state {
        FetchState::Idle | FetchState::Loading => format!("{}\n", LOADING_TEXT),
        FetchState::Failed(err) => format!("{}\n", render_error(err)),
        FetchState::Loaded(movies) if movies.is_empty() => format!("{}\n", EMPTY_TEXT),
        FetchState::Loaded(movies) => movies
            .iter()
            .map(render_card)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// 单张电影卡片
pub fn render_card(movie: &MovieRecord) -> String {
    let lines = [
        movie.title.clone(),
        format!("Genre: {}", movie.genre),
        format!("Rating: {}", movie.display_rating()),
        format!("Year: {}", movie.year),
    ];
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "+-{}-+", "-".repeat(width));
    for line in &lines {
        let pad = width - line.chars().count();
        let _ = writeln!(out, "| {}{} |", line, " ".repeat(pad));
    }
    let _ = writeln!(out, "+-{}-+", "-".repeat(width));
    out
}

/// 错误原样输出为 JSON（4 空格缩进）
pub fn render_error(err: &FetchError) -> String {
    to_pretty_json(err).unwrap_or_else(|_| err.to_string())
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn render_select<T: PartialEq + std::fmt::Display>(options: &[T], current: &T) -> String {
    options
        .iter()
        .map(|option| {
            if option == current {
                format!("[{}]", option)
            } else {
                option.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn render_slider(min: f64, max: f64, value: Option<f64>, label: Option<String>) -> String {
    let position = value.map(|v| {
        let ratio = ((v - min) / (max - min)).clamp(0.0, 1.0);
        (ratio * (SLIDER_WIDTH - 1) as f64).round() as usize
    });

    let track: String = (0..SLIDER_WIDTH)
        .map(|i| if Some(i) == position { 'o' } else { '-' })
        .collect();

    format!(
        "{} [{}] {}  {}",
        trim_number(min),
        track,
        trim_number(max),
        label.unwrap_or_else(|| "any".to_string())
    )
}

fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// 滑块步长说明（用于帮助信息）
pub fn slider_hint() -> String {
    format!(
        "rating: {}..{} step {}, year: {}..{} step 1",
        trim_number(RATING_MIN),
        trim_number(RATING_MAX),
        RATING_STEP,
        YEAR_MIN,
        YEAR_MAX
    )
}
