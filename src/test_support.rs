//! 测试用的假 TwelveData 服务
//!
//! 在 127.0.0.1 随机端口启动，按请求参数返回固定数据

use std::collections::HashMap;

use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde_json::json;

/// 假服务接受的 API Key
pub const VALID_KEY: &str = "test-key";

/// 无法连接的地址，用于模拟网络失败
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

pub struct FakeUpstream {
    pub base_url: String,
    handle: ServerHandle,
}

impl FakeUpstream {
    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

type Params = web::Query<HashMap<String, String>>;

fn key_error(params: &Params) -> Option<HttpResponse> {
    if params.get("apikey").map(String::as_str) == Some(VALID_KEY) {
        return None;
    }
    Some(HttpResponse::Ok().json(json!({
        "code": 401,
        "status": "error",
        "message": "**apikey** parameter is incorrect or not specified."
    })))
}

async fn quote(params: Params) -> HttpResponse {
    if let Some(resp) = key_error(&params) {
        return resp;
    }

    let symbol = params.get("symbol").cloned().unwrap_or_default();
    match symbol.as_str() {
        "RELIANCE.BSE" | "AAPL" => HttpResponse::Ok().json(json!({
            "symbol": symbol,
            "name": "Reliance Industries Limited",
            "exchange": "BSE",
            "close": "2851.15",
            "change": "48.75",
            "percent_change": "1.74",
            "volume": "4821300",
            "market_cap": "19.29T",
            "pe_ratio": "28.6",
            "fifty_two_week": { "high": "3024.90", "low": "2220.30" }
        })),
        "NORANGE.BSE" => HttpResponse::Ok().json(json!({
            "symbol": symbol,
            "name": "No Range Ltd",
            "close": "100.50",
            "change": "-1.25",
            "percent_change": "-1.23"
        })),
        "BROKEN.BSE" => HttpResponse::InternalServerError().body("upstream failure"),
        _ => HttpResponse::Ok().json(json!({
            "code": 404,
            "status": "error",
            "message": "symbol not found"
        })),
    }
}

async fn symbol_search(params: Params) -> HttpResponse {
    if let Some(resp) = key_error(&params) {
        return resp;
    }

    let query = params.get("symbol").cloned().unwrap_or_default();
    let mut data = vec![json!({
        "symbol": query,
        "instrument_name": "Listed Abroad Inc",
        "exchange": "NASDAQ",
        "country": "United States",
        "instrument_type": "Common Stock"
    })];
    for i in 0..12 {
        let exchange = if i % 2 == 0 { "NSE" } else { "BSE" };
        data.push(json!({
            "symbol": format!("{}{}", query, i),
            "instrument_name": format!("Tata Consultancy Services {}", i),
            "exchange": exchange,
            "country": "India",
            "instrument_type": "Common Stock"
        }));
    }

    HttpResponse::Ok().json(json!({ "data": data, "status": "ok" }))
}

async fn time_series(params: Params) -> HttpResponse {
    if let Some(resp) = key_error(&params) {
        return resp;
    }

    HttpResponse::Ok().json(json!({
        "meta": { "symbol": params.get("symbol"), "interval": params.get("interval") },
        "values": [
            { "datetime": "2024-01-05 15:29:00", "open": "1846.0", "high": "1847.5", "low": "1845.2", "close": "1845.3", "volume": "1200" },
            { "datetime": "2024-01-05 15:28:00", "open": "1845.0", "high": "1846.2", "low": "1844.8", "close": "1846.0", "volume": "980" },
            { "datetime": "2024-01-05 15:27:00", "open": "1844.1", "high": "1845.3", "low": "1843.9", "close": "1845.0", "volume": "1010" }
        ],
        "status": "ok"
    }))
}

/// 启动假服务，需在 actix 运行时内调用
pub fn spawn_fake_upstream() -> FakeUpstream {
    let server = HttpServer::new(|| {
        App::new()
            .route("/quote", web::get().to(quote))
            .route("/symbol_search", web::get().to(symbol_search))
            .route("/time_series", web::get().to(time_series))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("绑定测试端口失败");

    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    FakeUpstream {
        base_url: format!("http://{}", addr),
        handle,
    }
}
