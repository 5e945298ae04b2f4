use actix_web::web;

pub mod health;
pub mod proxy;

/// 配置所有路由
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::config).configure(proxy::config);
}
