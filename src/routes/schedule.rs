use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::schedule::requests::CreateRoutineRequest;
use crate::models::users::entities::UserRole;
use crate::services::ScheduleService;
use crate::utils::{SafeClassIdI64, SafeRoutineIdI64};

static SCHEDULE_SERVICE: Lazy<ScheduleService> = Lazy::new(ScheduleService::new_lazy);

pub async fn schedule_overview(req: HttpRequest) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.overview(&req).await
}

pub async fn class_schedule(
    req: HttpRequest,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.class_schedule(&req, class_id.0).await
}

pub async fn my_schedule(req: HttpRequest) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.my_schedule(&req).await
}

pub async fn create_routine(
    req: HttpRequest,
    routine_data: web::Json<CreateRoutineRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .create_routine(&req, routine_data.into_inner())
        .await
}

pub async fn delete_routine(
    req: HttpRequest,
    routine_id: SafeRoutineIdI64,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.delete_routine(&req, routine_id.0).await
}

// 配置路由
pub fn configure_schedule_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/schedule")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(
                    web::get()
                        .to(schedule_overview)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/classes/{class_id}").route(
                    web::get()
                        .to(class_schedule)
                        .wrap(middlewares::RequireRole::new_any(
                            UserRole::schedule_viewer_roles(),
                        )),
                ),
            )
            .service(
                web::resource("/mine").route(
                    web::get()
                        .to(my_schedule)
                        .wrap(middlewares::RequireRole::new_any(
                            UserRole::teacher_portal_roles(),
                        )),
                ),
            )
            .service(
                web::resource("/routines").route(
                    web::post()
                        .to(create_routine)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/routines/{routine_id}").route(
                    web::delete()
                        .to(delete_routine)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );
}
