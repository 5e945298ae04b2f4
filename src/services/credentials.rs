//! 用户 TwelveData API Key 的保存与校验

use crate::error::StoreError;

use super::quote_api::QuoteApi;
use super::storage::LocalStorage;

/// API Key 在存储中的键
pub const API_KEY_KEY: &str = "twelvedata_api_key";

pub struct CredentialStore {
    storage: LocalStorage,
}

impl CredentialStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// 读取已校验的 Key，读取失败时视为未配置
    pub fn load(&self) -> Option<String> {
        match self.storage.get::<String>(API_KEY_KEY) {
            Ok(key) => key.filter(|k| !k.trim().is_empty()),
            Err(e) => {
                log::warn!("读取 API Key 失败: {}", e);
                None
            }
        }
    }

    /// 校验通过后保存，返回是否有效
    pub async fn validate_and_save(&self, api: &QuoteApi, api_key: &str) -> Result<bool, StoreError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Ok(false);
        }

        if !api.validate_api_key(api_key).await {
            return Ok(false);
        }

        self.storage.set(API_KEY_KEY, api_key)?;
        log::info!("API Key 校验通过并已保存");
        Ok(true)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove(API_KEY_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_fake_upstream, UNREACHABLE_URL, VALID_KEY};

    #[tokio::test]
    async fn test_blank_and_unreachable() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(LocalStorage::new(dir.path()));
        let api = QuoteApi::new(UNREACHABLE_URL, "").unwrap();

        assert!(!store.validate_and_save(&api, "   ").await.unwrap());
        assert!(!store.validate_and_save(&api, VALID_KEY).await.unwrap());
        assert!(store.load().is_none());
    }

    #[actix_web::test]
    async fn test_validate_and_save() {
        let upstream = spawn_fake_upstream();
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(LocalStorage::new(dir.path()));
        let api = QuoteApi::new(&upstream.base_url, "").unwrap();

        assert!(!store.validate_and_save(&api, "wrong").await.unwrap());
        assert!(store.load().is_none());

        assert!(store.validate_and_save(&api, &format!(" {} ", VALID_KEY)).await.unwrap());
        assert_eq!(store.load().as_deref(), Some(VALID_KEY));

        let reopened = CredentialStore::new(LocalStorage::new(dir.path()));
        assert_eq!(reopened.load().as_deref(), Some(VALID_KEY));

        reopened.clear().unwrap();
        assert!(store.load().is_none());

        upstream.stop().await;
    }
}
