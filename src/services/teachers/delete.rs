use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::invalidate_user_cache;

pub async fn delete_teacher(
    service: &TeacherService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 删除前使缓存失效，删除后账号已不存在
    match storage.get_teacher_by_id(id).await {
        Ok(Some(teacher)) => {
            invalidate_user_cache(request, &storage, teacher.teacher.user_id).await;
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TeacherNotFound,
                "Teacher not found",
            )));
        }
        Err(e) => {
            return Ok(portal_error_response(
                &e,
                ErrorCode::InternalServerError,
                "Failed to delete teacher",
            ));
        }
    }

    match storage.delete_teacher(id).await {
        Ok(true) => {
            info!("Teacher {} deleted", id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Teacher deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TeacherNotFound,
            "Teacher not found",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to delete teacher",
        )),
    }
}
