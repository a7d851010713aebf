use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::classes::responses::TeacherClassListResponse;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::current_teacher;

pub async fn list_my_classes(
    service: &ClassService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let teacher = match current_teacher(&storage, request).await {
        Ok(teacher) => teacher,
        Err(resp) => return Ok(resp),
    };

    match storage.list_teacher_classes(teacher.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TeacherClassListResponse { items },
            "Class list retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve class list",
        )),
    }
}
