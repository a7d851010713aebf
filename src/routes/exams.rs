use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::exams::requests::{CreateExamRequest, GradingSheetQuery};
use crate::models::users::entities::UserRole;
use crate::services::ExamService;
use crate::utils::SafeExamIdI64;

static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);

pub async fn list_exams(req: HttpRequest) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_exams(&req).await
}

pub async fn create_exam(
    req: HttpRequest,
    exam_data: web::Json<CreateExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.create_exam(&req, exam_data.into_inner()).await
}

pub async fn delete_exam(req: HttpRequest, exam_id: SafeExamIdI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.delete_exam(&req, exam_id.0).await
}

pub async fn grading_sheet(
    req: HttpRequest,
    exam_id: SafeExamIdI64,
    query: web::Query<GradingSheetQuery>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .grading_sheet(&req, exam_id.0, query.into_inner())
        .await
}

// 配置路由
pub fn configure_exams_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exams")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_exams)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_exam)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{exam_id}").route(
                    web::delete()
                        .to(delete_exam)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{exam_id}/sheet").route(
                    web::get()
                        .to(grading_sheet)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );
}
