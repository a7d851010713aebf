use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ParentService;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::invalidate_user_cache;

pub async fn delete_parent(
    service: &ParentService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_parent_by_id(id).await {
        Ok(Some(parent)) => {
            invalidate_user_cache(request, &storage, parent.parent.user_id).await;
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ParentNotFound,
                "Parent not found",
            )));
        }
        Err(e) => {
            return Ok(portal_error_response(
                &e,
                ErrorCode::InternalServerError,
                "Failed to delete parent",
            ));
        }
    }

    match storage.delete_parent(id).await {
        Ok(true) => {
            info!("Parent {} deleted", id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Parent deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ParentNotFound,
            "Parent not found",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to delete parent",
        )),
    }
}
