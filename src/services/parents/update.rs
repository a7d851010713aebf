use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ParentService, check_phone, write_error_code};
use crate::models::parents::requests::UpdateParentRequest;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::{invalidate_user_cache, validate_person};

pub async fn update_parent(
    service: &ParentService,
    request: &HttpRequest,
    id: i64,
    update_data: UpdateParentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(resp) = validate_person(&update_data.full_name(), &update_data.email)
        .and_then(|_| check_phone(&update_data.phone))
    {
        return Ok(resp);
    }

    match storage.update_parent(id, update_data).await {
        Ok(Some(parent)) => {
            info!("Parent {} updated", parent.parent.id);
            invalidate_user_cache(request, &storage, parent.parent.user_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                parent,
                "Parent updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ParentNotFound,
            "Parent not found",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            write_error_code(&e),
            "Failed to update parent",
        )),
    }
}
