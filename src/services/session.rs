//! 用户会话组装
//!
//! 按配置创建行情客户端、自选列表、API Key 存储和刷新任务工厂，供展示层使用

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::{QuoteError, StoreError};

use super::credentials::CredentialStore;
use super::directory::StockDirectory;
use super::quote_api::QuoteApi;
use super::refresher::QuoteRefresher;
use super::stock_provider::StockProvider;
use super::storage::LocalStorage;
use super::watchlist::WatchlistStore;

/// 未配置任何 Key 时使用的演示 Key
pub const DEMO_API_KEY: &str = "demo";

pub struct Session {
    config: AppConfig,
    provider: StockProvider<Arc<QuoteApi>>,
    refresher: QuoteRefresher<QuoteApi>,
    credentials: CredentialStore,
}

impl Session {
    /// 打开会话
    ///
    /// API Key 优先级：已保存的用户 Key > 配置中的 Key > 演示 Key
    pub fn open(config: AppConfig) -> Result<Self, QuoteError> {
        let storage = LocalStorage::new(&config.storage.data_dir);
        let credentials = CredentialStore::new(storage.clone());

        let api_key = credentials
            .load()
            .or_else(|| Some(config.api.api_key.clone()).filter(|k| !k.is_empty()))
            .unwrap_or_else(|| DEMO_API_KEY.to_string());

        let api = Arc::new(QuoteApi::from_config(&config.api, api_key)?);
        let directory = StockDirectory::new();
        let refresher = QuoteRefresher::new(api.clone(), directory.clone(), config.refresh.interval());
        let provider = StockProvider::new(api, directory, WatchlistStore::load(storage));

        Ok(Self {
            config,
            provider,
            refresher,
            credentials,
        })
    }

    pub fn provider(&self) -> &StockProvider<Arc<QuoteApi>> {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut StockProvider<Arc<QuoteApi>> {
        &mut self.provider
    }

    pub fn refresher(&self) -> &QuoteRefresher<QuoteApi> {
        &self.refresher
    }

    /// 校验并保存用户的 API Key，有效时立即切换
    ///
    /// 已启动的刷新任务继续使用旧 Key，重新 watch 后生效
    pub async fn set_api_key(&mut self, api_key: &str) -> Result<bool, StoreError> {
        if !self.credentials.validate_and_save(self.provider.quotes(), api_key).await? {
            return Ok(false);
        }

        match QuoteApi::from_config(&self.config.api, api_key.trim()) {
            Ok(api) => {
                let api = Arc::new(api);
                self.refresher = QuoteRefresher::new(
                    api.clone(),
                    self.provider.directory().clone(),
                    self.config.refresh.interval(),
                );
                self.provider.replace_quotes(api);
                Ok(true)
            }
            Err(e) => {
                log::error!("创建行情客户端失败: {}", e);
                Ok(false)
            }
        }
    }
}
