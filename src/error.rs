//! 错误类型定义
//!
//! - `QuoteError`: 行情接口调用失败（网络、上游、解析）
//! - `StoreError`: 本地持久化读写失败

use thiserror::Error;

/// 行情接口错误
#[derive(Error, Debug)]
pub enum QuoteError {
    /// 网络层失败（DNS、连接、超时）
    #[error("请求行情接口失败: {0}")]
    Transport(#[from] reqwest::Error),

    /// 上游返回非 2xx 状态码
    #[error("API request failed: {0}")]
    Status(reqwest::StatusCode),

    /// 响应体内 status 为 error
    #[error("{0}")]
    Upstream(String),

    /// 响应体内 status 为 error 且没有 message
    #[error("API error")]
    UnspecifiedUpstream,

    /// 响应结构不符合预期
    #[error("解析行情数据失败: {0}")]
    Parse(String),

    /// 代理端未配置 API Key
    #[error("TwelveData API key not configured")]
    MissingApiKey,
}

impl From<serde_json::Error> for QuoteError {
    fn from(err: serde_json::Error) -> Self {
        QuoteError::Parse(err.to_string())
    }
}

impl From<url::ParseError> for QuoteError {
    fn from(err: url::ParseError) -> Self {
        QuoteError::Parse(format!("无效的接口地址: {}", err))
    }
}

/// 本地存储错误
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("存储读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("存储数据序列化失败: {0}")]
    Json(#[from] serde_json::Error),
}
