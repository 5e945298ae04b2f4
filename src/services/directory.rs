//! 热门印度股票静态数据
//!
//! 作为行情接口失败时的兜底数据、搜索失败时的兜底搜索源，以及首页热门列表

use crate::models::Stock;

/// (代码, 名称, 价格, 涨跌额, 涨跌幅)
const SEED_STOCKS: [(&str, &str, f64, f64, f64); 10] = [
    ("RELIANCE.BSE", "Reliance Industries Ltd", 2847.60, 45.20, 1.61),
    ("TCS.BSE", "Tata Consultancy Services", 4125.75, -32.15, -0.77),
    ("HDFCBANK.BSE", "HDFC Bank Ltd", 1678.90, 22.45, 1.36),
    ("INFY.BSE", "Infosys Ltd", 1845.30, 18.75, 1.03),
    ("ICICIBANK.BSE", "ICICI Bank Ltd", 1234.50, -15.20, -1.22),
    ("HINDUNILVR.BSE", "Hindustan Unilever Ltd", 2456.80, 28.90, 1.19),
    ("LT.BSE", "Larsen & Toubro Ltd", 3567.45, -42.30, -1.17),
    ("SBIN.BSE", "State Bank of India", 789.25, 12.35, 1.59),
    ("BHARTIARTL.BSE", "Bharti Airtel Ltd", 1456.70, 23.80, 1.66),
    ("ASIANPAINT.BSE", "Asian Paints Ltd", 3234.90, -18.45, -0.57),
];

/// 只读的股票目录
#[derive(Debug, Clone)]
pub struct StockDirectory {
    stocks: Vec<Stock>,
}

impl Default for StockDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl StockDirectory {
    pub fn new() -> Self {
        let stocks = SEED_STOCKS
            .iter()
            .map(|(symbol, name, price, change, pct)| Stock::basic(symbol, name, *price, *change, *pct))
            .collect();
        Self { stocks }
    }

    /// 全部股票，顺序固定
    pub fn all(&self) -> &[Stock] {
        &self.stocks
    }

    /// 按代码精确查找
    pub fn find_by_symbol(&self, symbol: &str) -> Option<&Stock> {
        self.stocks.iter().find(|stock| stock.symbol == symbol)
    }

    /// 名称或代码包含关键字（不区分大小写）
    pub fn search(&self, query: &str) -> Vec<Stock> {
        let query = query.to_lowercase();
        self.stocks
            .iter()
            .filter(|stock| {
                stock.name.to_lowercase().contains(&query) || stock.symbol.to_lowercase().contains(&query)
            })
            .cloned()
            .collect()
    }
}
