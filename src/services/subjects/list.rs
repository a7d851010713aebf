use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubjectService;
use crate::models::subjects::responses::SubjectListResponse;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};

pub async fn list_subjects(
    service: &SubjectService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_subjects().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubjectListResponse { items },
            "Subject list retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve subject list",
        )),
    }
}
