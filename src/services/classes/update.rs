use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassService, check_class_name};
use crate::models::classes::requests::UpdateClassRequest;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};

pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    update_data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(resp) = check_class_name(&update_data) {
        return Ok(resp);
    }

    match storage.update_class(class_id, update_data).await {
        Ok(Some(class)) => {
            info!("Class {} updated", class.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                class,
                "Class information updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::BadRequest,
            "Class update failed",
        )),
    }
}
