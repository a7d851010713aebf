use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StudentService, check_admission_no, write_error_code};
use crate::models::students::requests::UpdateStudentRequest;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::{invalidate_user_cache, validate_person};

pub async fn update_student(
    service: &StudentService,
    request: &HttpRequest,
    id: i64,
    update_data: UpdateStudentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(resp) = validate_person(&update_data.full_name(), &update_data.email)
        .and_then(|_| check_admission_no(&update_data.admission_no))
    {
        return Ok(resp);
    }

    match storage.update_student(id, update_data).await {
        Ok(Some(student)) => {
            info!("Student {} updated", student.student.id);
            invalidate_user_cache(request, &storage, student.student.user_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                student,
                "Student updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            write_error_code(&e),
            "Failed to update student",
        )),
    }
}
