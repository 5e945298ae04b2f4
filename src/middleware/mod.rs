//! 中间件

use actix_web::middleware::DefaultHeaders;

pub mod api_key;

pub use api_key::AccessTokenMiddleware;

/// 跨域响应头，所有响应都附带
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add((
            "Access-Control-Allow-Headers",
            "authorization, x-client-info, apikey, content-type",
        ))
}
