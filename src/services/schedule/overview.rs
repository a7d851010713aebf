use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ScheduleService;
use crate::models::schedule::responses::ScheduleOverviewResponse;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};

pub async fn schedule_overview(
    service: &ScheduleService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_class_routine_counts().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ScheduleOverviewResponse { items },
            "Schedule overview retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve schedule overview",
        )),
    }
}
