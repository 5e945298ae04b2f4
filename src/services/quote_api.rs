//! TwelveData 行情接口
//!
//! 对接 https://api.twelvedata.com
//! - GET /quote: 单只股票实时行情
//! - GET /symbol_search: 代码搜索（只保留印度交易所）
//! - GET /time_series: 分时数据
//!
//! API Key 以 `apikey` 查询参数附加，本模块不校验其格式。

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::ApiConfig;
use crate::error::QuoteError;
use crate::models::upstream::{check_status, parse_quote, parse_search_results, parse_time_series, RangePolicy};
use crate::models::{PricePoint, SearchResult, Stock};

/// 校验 API Key 时使用的代码
const VALIDATION_SYMBOL: &str = "AAPL";

/// 行情数据来源
///
/// 由 [`QuoteApi`] 实现，测试中可替换为假实现
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// 获取单只股票行情
    async fn get_quote(&self, symbol: &str) -> Result<Stock, QuoteError>;

    /// 搜索代码，失败时返回错误
    async fn try_search_symbols(&self, query: &str) -> Result<Vec<SearchResult>, QuoteError>;
}

/// TwelveData 接口客户端
///
/// 显式构造，API Key 在构造时传入
#[derive(Debug, Clone)]
pub struct QuoteApi {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl QuoteApi {
    /// 使用默认 HTTP 客户端创建
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, QuoteError> {
        Self::with_client(Client::new(), base_url, api_key)
    }

    /// 按配置的超时时间创建
    pub fn with_timeouts(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, QuoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;
        Self::with_client(client, base_url, api_key)
    }

    pub fn from_config(config: &ApiConfig, api_key: impl Into<String>) -> Result<Self, QuoteError> {
        Self::with_timeouts(&config.base_url, api_key, config.timeout(), config.connect_timeout())
    }

    fn with_client(client: Client, base_url: &str, api_key: impl Into<String>) -> Result<Self, QuoteError> {
        let mut base_url = Url::parse(base_url)?;
        // 保证 join 时保留已有路径
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// 是否配置了 API Key
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    fn endpoint_url(&self, endpoint: &str, api_key: &str, params: &[(&str, &str)]) -> Result<Url, QuoteError> {
        let mut url = self.base_url.join(endpoint)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("apikey", api_key);
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// 发起请求并检查 HTTP 状态，返回 JSON 响应体
    async fn make_request(&self, endpoint: &str, api_key: &str, params: &[(&str, &str)]) -> Result<Value, QuoteError> {
        let url = self.endpoint_url(endpoint, api_key, params)?;
        log::debug!("请求 TwelveData /{} {:?}", endpoint, params);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(QuoteError::Status(response.status()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| QuoteError::Parse(e.to_string()))
    }

    async fn fetch_quote(&self, symbol: &str, policy: RangePolicy) -> Result<Stock, QuoteError> {
        let payload = self.make_request("quote", &self.api_key, &[("symbol", symbol)]).await?;
        parse_quote(&payload, symbol, policy)
    }

    /// 获取单只股票行情，52 周区间缺失时留空
    ///
    /// 失败时不重试，由调用方决定是否使用兜底数据并记录日志
    pub async fn get_quote(&self, symbol: &str) -> Result<Stock, QuoteError> {
        self.fetch_quote(symbol, RangePolicy::Optional).await
    }

    /// 获取单只股票行情，要求上游返回 52 周区间（代理接口使用）
    pub async fn get_quote_strict(&self, symbol: &str) -> Result<Stock, QuoteError> {
        if !self.has_api_key() {
            return Err(QuoteError::MissingApiKey);
        }
        self.fetch_quote(symbol, RangePolicy::Required).await
    }

    /// 搜索代码，失败时返回错误
    pub async fn try_search_symbols(&self, query: &str) -> Result<Vec<SearchResult>, QuoteError> {
        let payload = self.make_request("symbol_search", &self.api_key, &[("symbol", query)]).await?;
        parse_search_results(&payload)
    }

    /// 搜索代码，任何失败都返回空列表
    pub async fn search_symbols(&self, query: &str) -> Vec<SearchResult> {
        match self.try_search_symbols(query).await {
            Ok(results) => results,
            Err(e) => {
                log::warn!("搜索 {} 失败: {}", query, e);
                Vec::new()
            }
        }
    }

    /// 获取分时数据，按时间正序返回
    pub async fn get_time_series(
        &self,
        symbol: &str,
        interval: &str,
        outputsize: usize,
    ) -> Result<Vec<PricePoint>, QuoteError> {
        let outputsize = outputsize.to_string();
        let payload = self
            .make_request(
                "time_series",
                &self.api_key,
                &[("symbol", symbol), ("interval", interval), ("outputsize", &outputsize)],
            )
            .await?;
        parse_time_series(&payload)
    }

    /// 用给定的 Key 请求一次行情，判断 Key 是否可用
    pub async fn validate_api_key(&self, api_key: &str) -> bool {
        if api_key.trim().is_empty() {
            return false;
        }

        let result = self
            .make_request("quote", api_key, &[("symbol", VALIDATION_SYMBOL)])
            .await
            .and_then(|payload| check_status(&payload));

        match result {
            Ok(()) => true,
            Err(e) => {
                log::warn!("API Key 校验失败: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl QuoteSource for QuoteApi {
    async fn get_quote(&self, symbol: &str) -> Result<Stock, QuoteError> {
        QuoteApi::get_quote(self, symbol).await
    }

    async fn try_search_symbols(&self, query: &str) -> Result<Vec<SearchResult>, QuoteError> {
        QuoteApi::try_search_symbols(self, query).await
    }
}

#[async_trait]
impl<T: QuoteSource + ?Sized> QuoteSource for Arc<T> {
    async fn get_quote(&self, symbol: &str) -> Result<Stock, QuoteError> {
        self.as_ref().get_quote(symbol).await
    }

    async fn try_search_symbols(&self, query: &str) -> Result<Vec<SearchResult>, QuoteError> {
        self.as_ref().try_search_symbols(query).await
    }
}
