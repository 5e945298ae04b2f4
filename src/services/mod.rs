//! 业务逻辑服务模块
//!
//! 封装行情获取、自选列表和本地存储

pub mod credentials;   // API Key 保存与校验
pub mod directory;     // 热门股票静态数据
pub mod quote_api;     // TwelveData 行情接口
pub mod refresher;     // 行情定时刷新
pub mod session;       // 会话组装
pub mod stock_provider; // 数据门面（实时行情 + 兜底）
pub mod storage;       // 本地键值存储
pub mod watchlist;     // 自选列表

pub use credentials::CredentialStore;
pub use directory::StockDirectory;
pub use quote_api::{QuoteApi, QuoteSource};
pub use refresher::{PriceUpdate, QuoteRefresher, RefreshHandle};
pub use session::Session;
pub use stock_provider::StockProvider;
pub use storage::LocalStorage;
pub use watchlist::WatchlistStore;
