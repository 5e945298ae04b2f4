//! 行情定时刷新
//!
//! 为当前查看的股票启动一个可取消的定时任务：立即拉取一次，之后按固定间隔拉取。
//! 每次拉取相互独立，结果通过 watch 通道发布；发起更早的请求晚到时直接丢弃。
//! 切换股票时丢弃旧的 [`RefreshHandle`] 即可停止旧任务。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Notify};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::models::Stock;

use super::directory::StockDirectory;
use super::quote_api::QuoteSource;
use super::stock_provider::quote_or_fallback;

/// 默认刷新间隔
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// 最小刷新间隔
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// 一次刷新结果
#[derive(Debug, Clone, PartialEq)]
pub struct PriceUpdate {
    pub stock: Stock,
    /// 请求序号，越大表示发起越晚
    pub seq: u64,
    pub updated_at: DateTime<Utc>,
}

type UpdateSender = Arc<watch::Sender<Option<PriceUpdate>>>;

/// 只发布比当前结果更新的请求
fn publish(tx: &watch::Sender<Option<PriceUpdate>>, update: PriceUpdate) -> bool {
    tx.send_if_modified(|current| {
        if let Some(existing) = current {
            if existing.seq >= update.seq {
                log::debug!("丢弃过期行情 {} (seq {} <= {})", update.stock.symbol, update.seq, existing.seq);
                return false;
            }
        }
        *current = Some(update);
        true
    })
}

/// 刷新任务工厂
pub struct QuoteRefresher<Q> {
    source: Arc<Q>,
    directory: StockDirectory,
    interval: Duration,
}

impl<Q: QuoteSource + 'static> QuoteRefresher<Q> {
    /// 间隔小于 [`MIN_REFRESH_INTERVAL`] 时按最小间隔处理
    pub fn new(source: Arc<Q>, directory: StockDirectory, interval: Duration) -> Self {
        Self {
            source,
            directory,
            interval: interval.max(MIN_REFRESH_INTERVAL),
        }
    }

    /// 开始刷新某只股票，需在 tokio 运行时内调用
    pub fn watch(&self, symbol: &str) -> RefreshHandle {
        let (tx, rx) = watch::channel(None);
        let task = RefreshTask {
            source: self.source.clone(),
            directory: self.directory.clone(),
            symbol: symbol.to_string(),
            interval: self.interval,
            tx: Arc::new(tx),
            seq: Arc::new(AtomicU64::new(0)),
            notify: Arc::new(Notify::new()),
            cancel: CancellationToken::new(),
        };

        let handle = RefreshHandle {
            symbol: task.symbol.clone(),
            rx,
            notify: task.notify.clone(),
            cancel: task.cancel.clone(),
        };

        log::info!("开始刷新 {} 行情，间隔 {:?}", symbol, self.interval);
        tokio::spawn(task.run());
        handle
    }
}

struct RefreshTask<Q> {
    source: Arc<Q>,
    directory: StockDirectory,
    symbol: String,
    interval: Duration,
    tx: UpdateSender,
    seq: Arc<AtomicU64>,
    notify: Arc<Notify>,
    cancel: CancellationToken,
}

impl<Q: QuoteSource + 'static> RefreshTask<Q> {
    async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => {
                    log::debug!("{} 刷新任务已取消", self.symbol);
                    break;
                }
                _ = ticker.tick() => {}
                () = self.notify.notified() => {}
            }
            self.spawn_fetch();
        }
    }

    fn spawn_fetch(&self) {
        let source = self.source.clone();
        let directory = self.directory.clone();
        let symbol = self.symbol.clone();
        let tx = self.tx.clone();
        let seq = self.seq.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let seq = seq.fetch_add(1, Ordering::SeqCst);
            let result = tokio::select! {
                () = cancel.cancelled() => return,
                result = quote_or_fallback(source.as_ref(), &directory, &symbol) => result,
            };

            match result {
                Some(stock) => {
                    publish(&tx, PriceUpdate { stock, seq, updated_at: Utc::now() });
                }
                None => log::warn!("{} 无可用行情", symbol),
            }
        });
    }
}

/// 刷新任务句柄，丢弃时停止任务
pub struct RefreshHandle {
    symbol: String,
    rx: watch::Receiver<Option<PriceUpdate>>,
    notify: Arc<Notify>,
    cancel: CancellationToken,
}

impl RefreshHandle {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// 最新结果
    pub fn latest(&self) -> Option<PriceUpdate> {
        self.rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<PriceUpdate>> {
        self.rx.clone()
    }

    /// 立即拉取一次（手动刷新）
    pub fn refresh_now(&self) {
        self.notify.notify_one();
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
