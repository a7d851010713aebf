use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::DashboardService;

static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);

pub async fn admin_dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.admin_dashboard(&req).await
}

pub async fn teacher_dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.teacher_dashboard(&req).await
}

pub async fn student_dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.student_dashboard(&req).await
}

pub async fn parent_dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.parent_dashboard(&req).await
}

// 配置路由，每个门户一个首页
pub fn configure_dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/dashboard")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/admin").route(
                    web::get()
                        .to(admin_dashboard)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/teacher").route(
                    web::get()
                        .to(teacher_dashboard)
                        .wrap(middlewares::RequireRole::new_any(
                            UserRole::teacher_portal_roles(),
                        )),
                ),
            )
            .service(
                web::resource("/student").route(
                    web::get()
                        .to(student_dashboard)
                        .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                ),
            )
            .service(
                web::resource("/parent").route(
                    web::get()
                        .to(parent_dashboard)
                        .wrap(middlewares::RequireRole::new_any(UserRole::parent_roles())),
                ),
            ),
    );
}
