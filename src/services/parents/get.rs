use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ParentService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_parent(
    service: &ParentService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_parent_by_id(id).await {
        Ok(Some(parent)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            parent,
            "Parent retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ParentNotFound,
            "Parent not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get parent: {e}"),
            )),
        ),
    }
}
