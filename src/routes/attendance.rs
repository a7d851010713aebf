use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::{AttendanceSheetQuery, MarkAttendanceRequest};
use crate::models::users::entities::UserRole;
use crate::services::AttendanceService;
use crate::utils::SafeClassIdI64;

static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn attendance_overview(req: HttpRequest) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.overview(&req).await
}

pub async fn mark_attendance(
    req: HttpRequest,
    attendance_data: web::Json<MarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .mark_attendance(&req, attendance_data.into_inner())
        .await
}

pub async fn class_sheet(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    query: web::Query<AttendanceSheetQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .class_sheet(&req, class_id.0, query.into_inner())
        .await
}

pub async fn my_attendance(req: HttpRequest) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.my_attendance(&req).await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(attendance_overview)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::post()
                            .to(mark_attendance)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/classes/{class_id}").route(
                    web::get()
                        .to(class_sheet)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/mine").route(
                    web::get()
                        .to(my_attendance)
                        .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                ),
            ),
    );
}
