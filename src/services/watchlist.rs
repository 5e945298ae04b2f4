//! 自选列表
//!
//! 内存中保存有序的股票列表，每次修改后整体写回本地存储。
//! 添加时不检查重复代码，删除时移除所有同代码条目。

use crate::error::StoreError;
use crate::models::Stock;

use super::storage::LocalStorage;

/// 自选列表在存储中的键
pub const WATCHLIST_KEY: &str = "watchlist";

pub struct WatchlistStore {
    storage: LocalStorage,
    stocks: Vec<Stock>,
}

impl WatchlistStore {
    /// 从本地存储加载
    ///
    /// 不存在时为空列表；读取或解析失败时同样以空列表启动
    pub fn load(storage: LocalStorage) -> Self {
        let stocks = match storage.get::<Vec<Stock>>(WATCHLIST_KEY) {
            Ok(Some(stocks)) => {
                log::info!("加载自选列表: {} 条", stocks.len());
                stocks
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("自选列表数据损坏，使用空列表: {}", e);
                Vec::new()
            }
        };

        Self { storage, stocks }
    }

    pub fn list(&self) -> &[Stock] {
        &self.stocks
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    /// 追加到末尾并持久化
    pub fn add(&mut self, stock: Stock) -> Result<(), StoreError> {
        log::debug!("加入自选: {}", stock.symbol);
        self.stocks.push(stock);
        self.persist()
    }

    /// 移除该代码的全部条目并持久化
    pub fn remove(&mut self, symbol: &str) -> Result<(), StoreError> {
        self.stocks.retain(|stock| stock.symbol != symbol);
        self.persist()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.stocks.iter().any(|stock| stock.symbol == symbol)
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.storage.set(WATCHLIST_KEY, &self.stocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn stock(symbol: &str) -> Stock {
        Stock::basic(symbol, symbol, 100.0, 1.0, 1.0)
    }

    #[test]
    fn test_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = WatchlistStore::load(LocalStorage::new(dir.path()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_contains_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = WatchlistStore::load(LocalStorage::new(dir.path()));

        store.add(stock("TCS.BSE")).unwrap();
        assert!(store.contains("TCS.BSE"));
        assert!(!store.contains("tcs.bse"));

        store.remove("TCS.BSE").unwrap();
        assert!(!store.contains("TCS.BSE"));
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = WatchlistStore::load(LocalStorage::new(dir.path()));
        store.add(stock("INFY.BSE")).unwrap();
        store.add(stock("SBIN.BSE")).unwrap();

        store.remove("INFY.BSE").unwrap();
        let after_first = store.list().to_vec();
        store.remove("INFY.BSE").unwrap();
        assert_eq!(store.list(), after_first.as_slice());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicates_kept_and_removed_together() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = WatchlistStore::load(LocalStorage::new(dir.path()));
        store.add(stock("LT.BSE")).unwrap();
        store.add(stock("LT.BSE")).unwrap();
        assert_eq!(store.len(), 2);

        store.remove("LT.BSE").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_persist_and_reload_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = WatchlistStore::load(LocalStorage::new(dir.path()));
        for symbol in ["SBIN.BSE", "RELIANCE.BSE", "HDFCBANK.BSE"] {
            store.add(stock(symbol)).unwrap();
        }

        let reloaded = WatchlistStore::load(LocalStorage::new(dir.path()));
        assert_eq!(reloaded.list(), store.list());
        let symbols: Vec<&str> = reloaded.list().iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["SBIN.BSE", "RELIANCE.BSE", "HDFCBANK.BSE"]);
    }

    #[test]
    fn test_corrupt_mirror_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("watchlist.json"), "{not a list").unwrap();

        let mut store = WatchlistStore::load(LocalStorage::new(dir.path()));
        assert!(store.is_empty());

        store.add(stock("TCS.BSE")).unwrap();
        let reloaded = WatchlistStore::load(LocalStorage::new(dir.path()));
        assert_eq!(reloaded.len(), 1);
    }
}
