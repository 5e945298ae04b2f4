//! 通用 API 响应模型
//!
//! - 代理接口失败时返回 `{"error": "..."}`
//! - 健康检查使用统一的包装格式

use serde::{Deserialize, Serialize};
use chrono::Utc;
use chrono_tz::Asia::Kolkata;

/// 获取印度标准时间字符串（ISO 8601 格式，带+05:30时区）
pub fn get_ist_time() -> String {
    Utc::now().with_timezone(&Kolkata).to_rfc3339()
}

/// 代理接口错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// 统一 API 响应结构
///
/// - success: 请求是否成功
/// - data: 响应数据（成功时有值）
/// - message: 响应消息
/// - timestamp: 响应时间戳（印度标准时间）
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
            timestamp: get_ist_time(),
        }
    }
}
