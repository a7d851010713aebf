use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubjectService;
use crate::models::subjects::requests::CreateSubjectRequest;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};

pub async fn create_subject(
    service: &SubjectService,
    request: &HttpRequest,
    subject_data: CreateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if subject_data.name.trim().is_empty() || subject_data.class_id.is_none() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SubjectInvalid,
            "Subject name and class are required",
        )));
    }

    match storage.create_subject(subject_data).await {
        Ok(subject) => {
            info!(
                "Subject {} created for class {}: {}",
                subject.id, subject.class_id, subject.name
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(subject, "Subject created successfully")))
        }
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::SubjectInvalid,
            "Failed to create subject",
        )),
    }
}
