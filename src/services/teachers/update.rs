use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::errors::PortalError;
use crate::models::teachers::requests::UpdateTeacherRequest;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::{invalidate_user_cache, validate_person};

pub async fn update_teacher(
    service: &TeacherService,
    request: &HttpRequest,
    id: i64,
    update_data: UpdateTeacherRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(resp) = validate_person(&update_data.full_name(), &update_data.email) {
        return Ok(resp);
    }

    match storage.update_teacher(id, update_data).await {
        Ok(Some(teacher)) => {
            info!("Teacher {} updated", teacher.teacher.id);
            invalidate_user_cache(request, &storage, teacher.teacher.user_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                teacher,
                "Teacher updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TeacherNotFound,
            "Teacher not found",
        ))),
        Err(e) => {
            let code = match e {
                PortalError::Conflict(_) => ErrorCode::UserEmailAlreadyExists,
                _ => ErrorCode::BadRequest,
            };
            Ok(portal_error_response(&e, code, "Failed to update teacher"))
        }
    }
}
