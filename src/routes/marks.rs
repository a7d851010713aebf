use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::marks::requests::UpdateMarksRequest;
use crate::models::users::entities::UserRole;
use crate::services::MarkService;
use crate::utils::{SafeClassIdI64, SafeExamIdI64, SafeSubjectIdI64};

static MARK_SERVICE: Lazy<MarkService> = Lazy::new(MarkService::new_lazy);

pub async fn update_marks(
    req: HttpRequest,
    marks_data: web::Json<UpdateMarksRequest>,
) -> ActixResult<HttpResponse> {
    MARK_SERVICE.update_marks(&req, marks_data.into_inner()).await
}

pub async fn marks_overview(req: HttpRequest) -> ActixResult<HttpResponse> {
    MARK_SERVICE.overview(&req).await
}

pub async fn grading_sheet(
    req: HttpRequest,
    exam_id: SafeExamIdI64,
    class_id: SafeClassIdI64,
    subject_id: SafeSubjectIdI64,
) -> ActixResult<HttpResponse> {
    MARK_SERVICE
        .grading_sheet(&req, exam_id.0, class_id.0, subject_id.0)
        .await
}

pub async fn my_grades(req: HttpRequest) -> ActixResult<HttpResponse> {
    MARK_SERVICE.my_grades(&req).await
}

// 配置路由
pub fn configure_marks_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/marks")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(
                    web::post()
                        .to(update_marks)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/overview").route(
                    web::get()
                        .to(marks_overview)
                        .wrap(middlewares::RequireRole::new_any(
                            UserRole::teacher_portal_roles(),
                        )),
                ),
            )
            .service(
                web::resource("/sheet/{exam_id}/{class_id}/{subject_id}").route(
                    web::get()
                        .to(grading_sheet)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/mine").route(
                    web::get()
                        .to(my_grades)
                        .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                ),
            ),
    );
}
