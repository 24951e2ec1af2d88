// 请求错误类型定义
//
// 网络失败、非 2xx 状态、响应解析失败统一归为"请求失败"，
// 原始细节（URL、状态码、响应体）原样保留，交给展示层直接输出

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// 请求失败
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("Fetch failed: {message} ({url})")]
pub struct FetchError {
    /// 请求的完整 URL
    pub url: String,

    /// HTTP 状态码，网络层失败时为空
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// 底层错误信息
    pub message: String,

    /// 原始响应体；能解析为 JSON 时保留结构，否则保留文本
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,

    pub occurred_at: DateTime<Utc>,
}

impl FetchError {
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: None,
            message: message.into(),
            body: None,
            occurred_at: Utc::now(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        if !body.is_empty() {
            let value = serde_json::from_str(body)
                .unwrap_or_else(|_| serde_json::Value::String(body.to_string()));
            self.body = Some(value);
        }
        self
    }

    /// 网络层错误（连接失败、超时等）
    pub fn from_reqwest(url: &str, err: &reqwest::Error) -> Self {
        let mut error = Self::new(url, err.to_string());
        if let Some(status) = err.status() {
            error.status = Some(status.as_u16());
        }
        error
    }
}
