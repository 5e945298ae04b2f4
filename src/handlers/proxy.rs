//! 行情代理接口
//!
//! 使用服务端持有的 API Key 转发请求到 TwelveData，调用方无需也无法获得该 Key
//!
//! ## API 列表
//! - POST /search-stocks  {"query": "..."}  -> [SearchResult]
//! - POST /stock-data     {"symbol": "..."} -> Stock
//! - OPTIONS 以上两个路径 -> 跨域预检
//!
//! 失败统一返回 500 和 `{"error": "..."}`

use actix_web::http::Method;
use actix_web::{web, HttpResponse, Result};
use serde::de::DeserializeOwned;

use crate::error::QuoteError;
use crate::models::{ErrorResponse, QuoteRequest, SearchRequest, SearchResult, Stock};
use crate::services::QuoteApi;

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, QuoteError> {
    Ok(serde_json::from_slice(body)?)
}

/// 失败统一返回 500
///
/// 上游非 2xx 时返回 `request_failed`，上游报错但没有 message 时返回 `api_error`
fn error_response(e: &QuoteError, request_failed: &str, api_error: &str) -> HttpResponse {
    let message = match e {
        QuoteError::Status(_) => request_failed.to_string(),
        QuoteError::UnspecifiedUpstream => api_error.to_string(),
        other => other.to_string(),
    };
    HttpResponse::InternalServerError().json(ErrorResponse::new(message))
}

/// 搜索印度股票
///
/// POST /search-stocks
pub async fn search_stocks(api: web::Data<QuoteApi>, body: web::Bytes) -> Result<HttpResponse> {
    let result: Result<Vec<SearchResult>, QuoteError> = async {
        let request: SearchRequest = parse_body(&body)?;
        if !api.has_api_key() {
            return Err(QuoteError::MissingApiKey);
        }
        api.try_search_symbols(&request.query).await
    }
    .await;

    match result {
        Ok(results) => Ok(HttpResponse::Ok().json(results)),
        Err(e) => {
            log::error!("搜索股票失败: {}", e);
            Ok(error_response(&e, "Failed to search stocks", "Search API error"))
        }
    }
}

/// 获取单只股票行情
///
/// POST /stock-data
///
/// 上游缺少 52 周区间时整次请求失败
pub async fn stock_data(api: web::Data<QuoteApi>, body: web::Bytes) -> Result<HttpResponse> {
    let result: Result<Stock, QuoteError> = async {
        let request: QuoteRequest = parse_body(&body)?;
        api.get_quote_strict(&request.symbol).await
    }
    .await;

    match result {
        Ok(stock) => Ok(HttpResponse::Ok().json(stock)),
        Err(e) => {
            log::error!("获取股票数据失败: {}", e);
            Ok(error_response(&e, "Failed to fetch stock data", "API error"))
        }
    }
}

/// 跨域预检
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/search-stocks")
            .route(web::post().to(search_stocks))
            .route(web::method(Method::OPTIONS).to(preflight)),
    )
    .service(
        web::resource("/stock-data")
            .route(web::post().to(stock_data))
            .route(web::method(Method::OPTIONS).to(preflight)),
    );
}
