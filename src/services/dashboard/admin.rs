use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DashboardService;
use crate::errors::Result;
use crate::models::dashboard::responses::AdminDashboardResponse;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::storage::Storage;

pub async fn admin_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match collect(&storage).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Dashboard retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to load dashboard",
        )),
    }
}

async fn collect(storage: &Arc<dyn Storage>) -> Result<AdminDashboardResponse> {
    let date = chrono::Local::now().date_naive();
    Ok(AdminDashboardResponse {
        student_count: storage.count_students().await? as i64,
        teacher_count: storage.count_teachers().await? as i64,
        class_count: storage.count_classes().await? as i64,
        attendance_today: storage.attendance_totals_on(date).await?,
        date,
    })
}
