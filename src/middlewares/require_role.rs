/*!
 * 门户角色授权中间件
 *
 * 每个账号只有一个角色，路由声明允许访问的角色集合，
 * 当前用户的角色在集合内即放行。必须在 RequireJWT 之后执行。
 *
 * ```rust,ignore
 * web::scope("/api/v1/teachers")
 *     .wrap(RequireRole::new_any(UserRole::admin_roles()))
 *     .wrap(RequireJWT) // 最后注册的最先执行
 *     .route("", web::get().to(list_teachers));
 * ```
 *
 * 未认证返回 401，角色不符返回 403。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed: Rc<[UserRole]>,
}

impl RequireRole {
    /// 允许集合中任一角色访问
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }

    pub fn permits(&self, role: &UserRole) -> bool {
        self.allowed.contains(role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            policy: self.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    policy: RequireRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let policy = self.policy.clone();

        Box::pin(async move {
            let caller = req
                .extensions()
                .get::<User>()
                .map(|user| (user.id, user.role.clone()));

            let (status, code, message) = match caller {
                Some((_, role)) if policy.permits(&role) => {
                    return Ok(srv.call(req).await?.map_into_left_body());
                }
                Some((user_id, role)) => {
                    info!(
                        "Access denied for user {} ({}) on {}, allowed: {:?}",
                        user_id,
                        role,
                        req.path(),
                        policy.allowed
                    );
                    (StatusCode::FORBIDDEN, ErrorCode::Forbidden, "Access denied")
                }
                None => {
                    // 路由缺少 RequireJWT
                    info!("Role check on {} without an authenticated user", req.path());
                    (
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                }
            };

            Ok(req.into_response(create_error_response(status, code, message).map_into_right_body()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test as actix_test, web};

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    fn user(role: UserRole) -> User {
        User {
            id: 7,
            external_id: "idp_7".to_string(),
            email: "someone@school.test".to_string(),
            full_name: "Some One".to_string(),
            role,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_permits() {
        let policy = RequireRole::new_any(UserRole::schedule_viewer_roles());
        assert!(policy.permits(&UserRole::Admin));
        assert!(policy.permits(&UserRole::Parent));
        assert!(!policy.permits(&UserRole::Teacher));
        assert!(!policy.permits(&UserRole::Student));
    }

    async fn status_for(role: Option<UserRole>) -> StatusCode {
        let app = actix_test::init_service(
            App::new().service(
                web::scope("/portal")
                    .wrap(RequireRole::new_any(UserRole::teacher_roles()))
                    .wrap_fn(move |req, srv| {
                        if let Some(role) = role.clone() {
                            req.extensions_mut().insert(user(role));
                        }
                        srv.call(req)
                    })
                    .route("", web::get().to(ok)),
            ),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/portal").to_request();
        actix_test::call_service(&app, req).await.status()
    }

    #[actix_web::test]
    async fn test_role_gate_statuses() {
        assert_eq!(status_for(Some(UserRole::Teacher)).await, StatusCode::OK);
        assert_eq!(status_for(Some(UserRole::Admin)).await, StatusCode::OK);
        assert_eq!(
            status_for(Some(UserRole::Student)).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(status_for(None).await, StatusCode::UNAUTHORIZED);
    }
}
