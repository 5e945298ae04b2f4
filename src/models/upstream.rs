//! TwelveData 响应解析
//!
//! 上游的数值字段以字符串形式返回，这里统一转换为本地模型。
//! - quote: 单只股票行情
//! - symbol_search: 代码搜索
//! - time_series: 分时数据

use chrono::NaiveDateTime;
use serde_json::Value;

use super::{PricePoint, SearchResult, Stock};
use crate::error::QuoteError;

/// 搜索结果最多返回条数
pub const MAX_SEARCH_RESULTS: usize = 10;

/// 印度交易所
pub const INDIAN_EXCHANGES: [&str; 2] = ["BSE", "NSE"];

/// 52 周区间的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePolicy {
    /// 缺失时留空，可选数值为 0 时也视为无数据（客户端）
    Optional,
    /// 缺失时整次请求失败，可选数值保留 0（代理端）
    Required,
}

/// 检查响应体内的错误标记
///
/// 上游可能以 HTTP 200 返回 `{"status": "error", "message": ...}`
pub fn check_status(payload: &Value) -> Result<(), QuoteError> {
    if payload["status"].as_str() == Some("error") {
        return Err(match payload["message"].as_str().filter(|m| !m.is_empty()) {
            Some(message) => QuoteError::Upstream(message.to_string()),
            None => QuoteError::UnspecifiedUpstream,
        });
    }
    Ok(())
}

/// 解析数值，兼容字符串和 JSON 数字
fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// 可选数值：缺失、无法解析或为 0 时视为无数据
fn optional_number(value: &Value) -> Option<f64> {
    number(value).filter(|v| *v != 0.0)
}

fn volume(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u64))
        }
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

fn optional_volume(value: &Value) -> Option<u64> {
    volume(value).filter(|v| *v > 0)
}

fn required_number(payload: &Value, field: &str) -> Result<f64, QuoteError> {
    number(&payload[field]).ok_or_else(|| QuoteError::Parse(format!("字段 {} 缺失或格式错误", field)))
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

/// 解析 /quote 响应
pub fn parse_quote(payload: &Value, requested: &str, policy: RangePolicy) -> Result<Stock, QuoteError> {
    check_status(payload)?;

    let symbol = non_empty_str(&payload["symbol"]).unwrap_or(requested).to_string();
    let name = non_empty_str(&payload["name"]).unwrap_or(&symbol).to_string();

    let range = &payload["fifty_two_week"];
    if policy == RangePolicy::Required && !range.is_object() {
        return Err(QuoteError::Parse("字段 fifty_two_week 缺失".to_string()));
    }

    // 代理端原样保留 0 值，只有缺失或无法解析时留空
    let keep_zero = policy == RangePolicy::Required;
    let read_number = |value: &Value| if keep_zero { number(value) } else { optional_number(value) };
    let read_volume = |value: &Value| if keep_zero { volume(value) } else { optional_volume(value) };

    Ok(Stock {
        price: required_number(payload, "close")?,
        change: required_number(payload, "change")?,
        change_percent: required_number(payload, "percent_change")?,
        volume: read_volume(&payload["volume"]),
        market_cap: non_empty_str(&payload["market_cap"]).map(str::to_string),
        pe: read_number(&payload["pe_ratio"]),
        high_52_week: read_number(&range["high"]),
        low_52_week: read_number(&range["low"]),
        symbol,
        name,
    })
}

/// 解析 /symbol_search 响应
///
/// 只保留 BSE/NSE 或国家为 India 的条目，按上游顺序取前 10 条
pub fn parse_search_results(payload: &Value) -> Result<Vec<SearchResult>, QuoteError> {
    check_status(payload)?;

    let Some(items) = payload["data"].as_array() else {
        return Ok(Vec::new());
    };

    let results = items
        .iter()
        .filter(|item| {
            let exchange = item["exchange"].as_str().unwrap_or("");
            INDIAN_EXCHANGES.contains(&exchange) || item["country"].as_str() == Some("India")
        })
        .take(MAX_SEARCH_RESULTS)
        .map(|item| {
            let symbol = item["symbol"].as_str().unwrap_or("").to_string();
            SearchResult {
                name: non_empty_str(&item["instrument_name"]).unwrap_or(&symbol).to_string(),
                exchange: item["exchange"].as_str().unwrap_or("").to_string(),
                country: item["country"].as_str().unwrap_or("").to_string(),
                instrument_type: item["instrument_type"].as_str().unwrap_or("").to_string(),
                symbol,
            }
        })
        .collect();

    Ok(results)
}

/// 将上游时间格式化为 HH:MM，无时间部分时原样返回
fn format_time(datetime: &str) -> String {
    NaiveDateTime::parse_from_str(datetime, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|_| datetime.to_string())
}

/// 解析 /time_series 响应
///
/// 上游按时间倒序返回，这里转为正序
pub fn parse_time_series(payload: &Value) -> Result<Vec<PricePoint>, QuoteError> {
    check_status(payload)?;

    let values = payload["values"]
        .as_array()
        .ok_or_else(|| QuoteError::Parse("No time series data available".to_string()))?;

    let mut points = values
        .iter()
        .map(|item| {
            Ok(PricePoint {
                time: format_time(item["datetime"].as_str().unwrap_or("")),
                price: required_number(item, "close")?,
                volume: optional_volume(&item["volume"]).unwrap_or(0),
                high: required_number(item, "high")?,
                low: required_number(item, "low")?,
                open: required_number(item, "open")?,
            })
        })
        .collect::<Result<Vec<_>, QuoteError>>()?;

    points.reverse();
    Ok(points)
}
