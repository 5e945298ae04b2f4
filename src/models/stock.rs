//! 股票数据模型
//!
//! 定义股票相关的数据结构

use serde::{Deserialize, Serialize};

/// 股票行情
///
/// 同时用于实时行情、自选列表持久化和代理接口的返回体
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    /// 带交易所后缀的代码（如 RELIANCE.BSE）
    pub symbol: String,
    /// 股票名称
    pub name: String,
    /// 当前价格
    pub price: f64,
    /// 涨跌额
    pub change: f64,
    /// 涨跌幅（百分比）
    pub change_percent: f64,
    /// 成交量
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
    /// 市值（上游已格式化的字符串）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<String>,
    /// 市盈率
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pe: Option<f64>,
    /// 52 周最高价
    #[serde(rename = "high52Week", default, skip_serializing_if = "Option::is_none")]
    pub high_52_week: Option<f64>,
    /// 52 周最低价
    #[serde(rename = "low52Week", default, skip_serializing_if = "Option::is_none")]
    pub low_52_week: Option<f64>,
}

impl Stock {
    /// 只含基础行情字段的记录
    pub fn basic(symbol: &str, name: &str, price: f64, change: f64, change_percent: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price,
            change,
            change_percent,
            volume: None,
            market_cap: None,
            pe: None,
            high_52_week: None,
            low_52_week: None,
        }
    }
}

/// 代码搜索结果，不做持久化
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SearchResult {
    pub symbol: String,
    pub name: String,
    /// 交易所（BSE / NSE）
    pub exchange: String,
    pub country: String,
    /// 品种类型（如 Common Stock）
    #[serde(rename = "type")]
    pub instrument_type: String,
}

/// 分时数据点
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PricePoint {
    /// 时间（HH:MM）
    pub time: String,
    pub price: f64,
    pub volume: u64,
    pub high: f64,
    pub low: f64,
    pub open: f64,
}

/// POST /search-stocks 请求体
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// POST /stock-data 请求体
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub symbol: String,
}
