use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ExamService;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};

pub async fn delete_exam(
    service: &ExamService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_exam(id).await {
        Ok(true) => {
            info!("Exam {} deleted", id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Exam deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ExamNotFound,
            "Exam not found",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to delete exam",
        )),
    }
}
