use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MarkService;
use crate::models::marks::responses::StudentGradesResponse;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::current_student;

pub async fn my_grades(service: &MarkService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let student = match current_student(&storage, request).await {
        Ok(student) => student,
        Err(resp) => return Ok(resp),
    };

    match storage.list_marks_by_student(student.id, None).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentGradesResponse { items },
            "Grades retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve grades",
        )),
    }
}
