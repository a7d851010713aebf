use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExamService;
use crate::models::exams::responses::ExamListResponse;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};

pub async fn list_exams(
    service: &ExamService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_exams().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ExamListResponse { items },
            "Exam list retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve exam list",
        )),
    }
}
