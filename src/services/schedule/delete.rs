use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ScheduleService;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};

pub async fn delete_routine(
    service: &ScheduleService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_routine(id).await {
        Ok(Some(routine)) => {
            info!("Routine {} deleted from class {}", routine.id, routine.class_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Routine deleted successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::RoutineNotFound,
            "Routine not found",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to delete routine",
        )),
    }
}
