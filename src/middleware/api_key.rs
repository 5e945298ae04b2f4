//! 代理接口访问令牌中间件
//!
//! 通过 Header 中的 Authorization: Bearer <token> 进行认证。
//! 令牌为空时不启用认证；跨域预检和健康检查不需要认证。

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    Error, HttpResponse,
    body::EitherBody,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::models::ErrorResponse;

/// 访问令牌中间件
pub struct AccessTokenMiddleware {
    token: Rc<String>,
}

impl AccessTokenMiddleware {
    pub fn new(token: String) -> Self {
        Self {
            token: Rc::new(token),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessTokenMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AccessTokenMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AccessTokenMiddlewareService {
            service: Rc::new(service),
            token: self.token.clone(),
        })
    }
}

pub struct AccessTokenMiddlewareService<S> {
    service: Rc<S>,
    token: Rc<String>,
}

/// 是否跳过认证
fn is_exempt(req: &ServiceRequest, token: &str) -> bool {
    token.is_empty() || req.method() == Method::OPTIONS || req.path().ends_with("/health")
}

impl<S, B> Service<ServiceRequest> for AccessTokenMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let token = self.token.clone();

        Box::pin(async move {
            if is_exempt(&req, &token) {
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            }

            // 验证 Bearer Token
            let provided = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "));

            match provided {
                Some(value) if value == token.as_str() => {
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                _ => {
                    log::warn!("拒绝未认证请求: {} {}", req.method(), req.path());
                    let response = HttpResponse::Unauthorized().json(ErrorResponse::new("无效的 Bearer Token"));
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
