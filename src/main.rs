//! 行情代理服务
//!
//! 提供印度股票搜索和实时行情的 HTTP 代理接口
//! 数据来源：TwelveData
use actix_web::{web, App, HttpServer, middleware::Logger};
use env_logger::Env;

use watchlist_backend::config::AppConfig;
use watchlist_backend::handlers;
use watchlist_backend::middleware::{cors_headers, AccessTokenMiddleware};
use watchlist_backend::services::QuoteApi;

/// 应用程序入口
///
/// 启动 HTTP 服务器，默认监听 0.0.0.0:8080
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统，默认日志级别为 info
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::load();

    if config.api.api_key.is_empty() {
        log::warn!("未设置 TWELVE_DATA_API_KEY，代理接口将返回 500");
    }
    if config.api.access_token.is_empty() {
        log::warn!("未设置 PROXY_ACCESS_TOKEN，代理接口不启用认证");
    }

    let api = web::Data::new(QuoteApi::from_config(&config.api, config.api.api_key.clone())?);
    let access_token = config.api.access_token.clone();
    let bind_addr = config.bind_addr();

    log::info!("启动行情代理服务: {}", bind_addr);

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(AccessTokenMiddleware::new(access_token.clone()))  // 访问令牌认证
            .wrap(cors_headers())  // 跨域响应头
            .wrap(Logger::default())  // 添加请求日志中间件
            .app_data(api.clone())
            .configure(handlers::config)  // 配置路由
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(bind_addr)?.run().await?;
    Ok(())
}
