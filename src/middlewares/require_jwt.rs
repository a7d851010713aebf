/*!
 * 身份令牌认证中间件
 *
 * 校验外部身份提供方签发的 JWT，并把令牌对应的本地账号放入请求扩展。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::RequireJWT;
 *
 * App::new().service(
 *     web::scope("/api/v1/students")
 *         .wrap(RequireJWT)
 *         .route("", web::get().to(list_students)),
 * );
 * ```
 *
 * 处理程序中通过 `RequireJWT::extract_user_claims(&req)` 取得当前用户。
 *
 * ## 认证流程
 *
 * 1. 客户端在请求头中包含 `Authorization: Bearer <JWT_TOKEN>`
 * 2. 校验签名、过期时间以及（如已配置）签发方与受众
 * 3. 按 `user:<sub>` 查询对象缓存，未命中时同步本地账号：
 *    按身份 ID 查找，或按邮箱关联预建账号，或自动创建学生账号
 * 4. 成功时将用户写入缓存与请求扩展，否则返回 401
 */

use crate::cache::{ObjectCache, get_json, insert_json};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::{self, UserRole, user_cache_key};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

// 认证失败原因
enum AuthFailure {
    Unauthorized(String),
    SyncFailed(String),
}

// 辅助函数：校验身份令牌并解析本地账号
async fn authenticate(req: &ServiceRequest) -> Result<entities::User, AuthFailure> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| {
            AuthFailure::Unauthorized("Missing or invalid Authorization header".to_string())
        })?;

    let claims = JwtUtils::verify_identity_token(token).map_err(|err| {
        info!("Identity token validation failed: {}", err);
        AuthFailure::Unauthorized("Invalid identity token".to_string())
    })?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone());

    let cache_key = user_cache_key(&claims.sub);
    if let Some(cache) = cache.as_deref()
        && let Some(user) = get_json::<entities::User>(cache, &cache_key).await
    {
        debug!("User cache hit for identity {}", claims.sub);
        return Ok(user);
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| AuthFailure::SyncFailed("Storage is not available".to_string()))?;

    let user = storage
        .sync_identity_user(claims.into_profile())
        .await
        .map_err(|err| {
            error!("Failed to sync identity user: {}", err);
            AuthFailure::SyncFailed("Failed to sync user account".to_string())
        })?;

    if let Some(cache) = cache.as_deref() {
        insert_json(
            cache,
            cache_key,
            &user,
            AppConfig::get().cache.default_ttl,
        )
        .await;
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!("Authenticated user {} ({})", user.id, user.role);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(AuthFailure::Unauthorized(err)) => {
                    info!("Authentication failed for request to {}: {}", req.path(), err);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
                Err(AuthFailure::SyncFailed(err)) => Ok(req.into_response(
                    create_error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::IdentitySyncFailed,
                        &err,
                    )
                    .map_into_right_body(),
                )),
            }
        })
    }
}

// 辅助函数：从请求中提取用户信息
impl RequireJWT {
    /// 从请求扩展中提取当前用户
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<entities::User> {
        req.extensions().get::<entities::User>().cloned()
    }

    /// 从请求扩展中提取用户ID
    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<entities::User>().map(|user| user.id)
    }

    /// 从请求扩展中提取用户角色
    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<UserRole> {
        req.extensions()
            .get::<entities::User>()
            .map(|user| user.role.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test as actix_test};

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let app = actix_test::init_service(
            App::new().service(
                web::scope("/protected")
                    .wrap(RequireJWT)
                    .route("", web::get().to(ok)),
            ),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/protected").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_preflight_passes_through() {
        let app = actix_test::init_service(
            App::new().service(
                web::scope("/protected")
                    .wrap(RequireJWT)
                    .route("", web::get().to(ok)),
            ),
        )
        .await;

        let req = actix_test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/protected")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }
}
