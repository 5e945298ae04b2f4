//! 印度股票自选列表后端
//!
//! - 行情：对接 TwelveData，失败时回退到内置的热门股票数据
//! - 自选列表：本地 JSON 持久化
//! - 代理：服务端持有 API Key 的搜索和行情接口

pub mod config;
pub mod error;
pub mod handlers;   // HTTP 请求处理器
pub mod middleware; // 中间件
pub mod models;     // 数据模型定义
pub mod services;   // 业务逻辑服务

#[cfg(test)]
mod test_support;
