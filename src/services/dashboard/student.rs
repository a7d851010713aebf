use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DashboardService;
use crate::models::attendance::entities::AttendanceSummary;
use crate::models::dashboard::responses::StudentDashboardResponse;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::current_student;

pub async fn student_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let student = match current_student(&storage, request).await {
        Ok(student) => student,
        Err(resp) => return Ok(resp),
    };

    let class_name = match student.class_id {
        Some(class_id) => match storage.get_class_by_id(class_id).await {
            Ok(class) => class.map(|c| c.name),
            Err(e) => {
                return Ok(portal_error_response(
                    &e,
                    ErrorCode::InternalServerError,
                    "Failed to load class",
                ));
            }
        },
        None => None,
    };

    match storage.list_attendance_by_student(student.id, None).await {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentDashboardResponse {
                attendance: AttendanceSummary::from_records(&records),
                student,
                class_name,
            },
            "Dashboard retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to load attendance",
        )),
    }
}
