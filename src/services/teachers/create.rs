use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::errors::PortalError;
use crate::models::teachers::requests::CreateTeacherRequest;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::{invalidate_user_cache, validate_person};

pub async fn create_teacher(
    service: &TeacherService,
    request: &HttpRequest,
    teacher_data: CreateTeacherRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(resp) = validate_person(&teacher_data.full_name(), &teacher_data.email) {
        return Ok(resp);
    }

    match storage.create_teacher(teacher_data).await {
        Ok(teacher) => {
            info!(
                "Teacher {} created: {}",
                teacher.teacher.id, teacher.teacher.full_name
            );
            // 已有账号被提升为教师时角色发生变化
            invalidate_user_cache(request, &storage, teacher.teacher.user_id).await;
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(teacher, "Teacher created successfully")))
        }
        Err(e) => {
            let code = match e {
                PortalError::Conflict(_) => ErrorCode::UserEmailAlreadyExists,
                _ => ErrorCode::BadRequest,
            };
            Ok(portal_error_response(&e, code, "Failed to create teacher"))
        }
    }
}
