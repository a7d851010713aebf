use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn get_current_user(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.get_current_user(&request).await
}

// 配置路由
//
// 登录与注册由身份提供方完成，这里只提供当前用户信息
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/me").route(
                    web::get()
                        .to(get_current_user)
                        .wrap(middlewares::RequireRole::new_any(UserRole::all_roles())),
                ),
            ),
    );
}
