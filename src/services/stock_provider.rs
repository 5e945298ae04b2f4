//! 股票数据门面
//!
//! 组合行情接口、静态目录和自选列表，接口失败时回退到静态目录，不向上层抛错

use crate::error::StoreError;
use crate::models::{SearchResult, Stock};

use super::directory::StockDirectory;
use super::quote_api::QuoteSource;
use super::watchlist::WatchlistStore;

/// 获取实时行情，失败时使用静态目录
pub async fn quote_or_fallback<Q: QuoteSource + ?Sized>(
    source: &Q,
    directory: &StockDirectory,
    symbol: &str,
) -> Option<Stock> {
    match source.get_quote(symbol).await {
        Ok(stock) => Some(stock),
        Err(e) => {
            log::warn!("获取 {} 实时行情失败，使用静态数据: {}", symbol, e);
            directory.find_by_symbol(symbol).cloned()
        }
    }
}

pub struct StockProvider<Q: QuoteSource> {
    quotes: Q,
    directory: StockDirectory,
    watchlist: WatchlistStore,
}

impl<Q: QuoteSource> StockProvider<Q> {
    pub fn new(quotes: Q, directory: StockDirectory, watchlist: WatchlistStore) -> Self {
        Self {
            quotes,
            directory,
            watchlist,
        }
    }

    /// 更换行情来源（如用户保存了新的 API Key）
    pub fn replace_quotes(&mut self, quotes: Q) {
        self.quotes = quotes;
    }

    pub fn quotes(&self) -> &Q {
        &self.quotes
    }

    pub fn directory(&self) -> &StockDirectory {
        &self.directory
    }

    /// 热门股票
    pub fn popular_stocks(&self) -> &[Stock] {
        self.directory.all()
    }

    /// 静态目录中的股票详情
    pub fn get_stock_details(&self, symbol: &str) -> Option<Stock> {
        self.directory.find_by_symbol(symbol).cloned()
    }

    /// 实时行情，失败时返回静态数据
    pub async fn fetch_real_time_data(&self, symbol: &str) -> Option<Stock> {
        quote_or_fallback(&self.quotes, &self.directory, symbol).await
    }

    /// 搜索股票
    ///
    /// 命中静态目录的结果使用目录中的行情，其余结果价格为 0；
    /// 接口失败时在静态目录中按名称或代码模糊匹配
    pub async fn search_stocks(&self, query: &str) -> Vec<Stock> {
        match self.quotes.try_search_symbols(query).await {
            Ok(results) => results.iter().map(|result| self.to_stock(result)).collect(),
            Err(e) => {
                log::warn!("搜索接口失败，使用静态目录: {}", e);
                self.directory.search(query)
            }
        }
    }

    fn to_stock(&self, result: &SearchResult) -> Stock {
        let name = result.name.to_lowercase();
        self.directory
            .all()
            .iter()
            .find(|stock| stock.symbol.contains(&result.symbol) || stock.name.to_lowercase().contains(&name))
            .cloned()
            .unwrap_or_else(|| Stock::basic(&result.symbol, &result.name, 0.0, 0.0, 0.0))
    }

    pub fn watchlist(&self) -> &[Stock] {
        self.watchlist.list()
    }

    pub fn add_to_watchlist(&mut self, stock: Stock) -> Result<(), StoreError> {
        self.watchlist.add(stock)
    }

    pub fn remove_from_watchlist(&mut self, symbol: &str) -> Result<(), StoreError> {
        self.watchlist.remove(symbol)
    }

    pub fn is_in_watchlist(&self, symbol: &str) -> bool {
        self.watchlist.contains(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuoteError;
    use crate::services::storage::LocalStorage;
    use crate::services::QuoteApi;
    use crate::test_support::{UNREACHABLE_URL, VALID_KEY};
    use async_trait::async_trait;

    /// 固定返回结果的假行情源
    struct FakeQuotes {
        quote: Option<Stock>,
        search: Option<Vec<SearchResult>>,
    }

    #[async_trait]
    impl QuoteSource for FakeQuotes {
        async fn get_quote(&self, _symbol: &str) -> Result<Stock, QuoteError> {
            self.quote.clone().ok_or_else(|| QuoteError::Upstream("down".to_string()))
        }

        async fn try_search_symbols(&self, _query: &str) -> Result<Vec<SearchResult>, QuoteError> {
            self.search.clone().ok_or_else(|| QuoteError::Upstream("down".to_string()))
        }
    }

    fn provider<Q: QuoteSource>(quotes: Q, dir: &tempfile::TempDir) -> StockProvider<Q> {
        let watchlist = WatchlistStore::load(LocalStorage::new(dir.path()));
        StockProvider::new(quotes, StockDirectory::new(), watchlist)
    }

    fn hit(symbol: &str, name: &str) -> SearchResult {
        SearchResult {
            symbol: symbol.to_string(),
            name: name.to_string(),
            exchange: "NSE".to_string(),
            country: "India".to_string(),
            instrument_type: "Common Stock".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_falls_back_on_transport_failure() {
        let dir = tempfile::tempdir().unwrap();
        let api = QuoteApi::new(UNREACHABLE_URL, VALID_KEY).unwrap();
        let provider = provider(api, &dir);

        let stock = provider.fetch_real_time_data("RELIANCE.BSE").await.unwrap();
        assert_eq!(stock.symbol, "RELIANCE.BSE");
        assert_eq!(stock.price, 2847.60);
        assert_eq!(stock.change, 45.20);
        assert_eq!(stock.change_percent, 1.61);

        assert!(provider.fetch_real_time_data("WIPRO.BSE").await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_prefers_live_quote() {
        let dir = tempfile::tempdir().unwrap();
        let live = Stock::basic("RELIANCE.BSE", "Reliance", 2900.0, 97.6, 3.48);
        let provider = provider(FakeQuotes { quote: Some(live.clone()), search: None }, &dir);

        assert_eq!(provider.fetch_real_time_data("RELIANCE.BSE").await, Some(live));
    }

    #[tokio::test]
    async fn test_search_falls_back_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let api = QuoteApi::new(UNREACHABLE_URL, VALID_KEY).unwrap();
        let provider = provider(api, &dir);

        let results = provider.search_stocks("TCS").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "TCS.BSE");
        assert_eq!(results[0].name, "Tata Consultancy Services");
    }

    #[tokio::test]
    async fn test_search_merges_directory_prices() {
        let dir = tempfile::tempdir().unwrap();
        let quotes = FakeQuotes {
            quote: None,
            search: Some(vec![hit("TCS", "Tata Consultancy Services"), hit("WIPRO", "Wipro Ltd")]),
        };
        let provider = provider(quotes, &dir);

        let results = provider.search_stocks("t").await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].symbol, "TCS.BSE");
        assert_eq!(results[0].price, 4125.75);
        assert_eq!(results[1].symbol, "WIPRO");
        assert_eq!(results[1].price, 0.0);
    }

    #[tokio::test]
    async fn test_empty_live_search_is_not_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(FakeQuotes { quote: None, search: Some(Vec::new()) }, &dir);
        assert!(provider.search_stocks("TCS").await.is_empty());
    }

    #[test]
    fn test_watchlist_passthrough() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = provider(FakeQuotes { quote: None, search: None }, &dir);

        let sbin = provider.get_stock_details("SBIN.BSE").unwrap();
        provider.add_to_watchlist(sbin).unwrap();
        assert!(provider.is_in_watchlist("SBIN.BSE"));
        assert_eq!(provider.watchlist().len(), 1);

        provider.remove_from_watchlist("SBIN.BSE").unwrap();
        provider.remove_from_watchlist("SBIN.BSE").unwrap();
        assert!(!provider.is_in_watchlist("SBIN.BSE"));
        assert_eq!(provider.popular_stocks().len(), 10);
    }
}
