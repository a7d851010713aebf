use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::attendance::responses::AttendanceOverviewResponse;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};

pub async fn attendance_overview(
    service: &AttendanceService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_classes().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttendanceOverviewResponse { items },
            "Attendance overview retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve attendance overview",
        )),
    }
}
