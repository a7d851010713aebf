use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AttendanceService;
use crate::middlewares::RequireJWT;
use crate::models::attendance::requests::MarkAttendanceRequest;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::check_class_teaching_permission;
use crate::utils::parse_date;

pub async fn mark_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    attendance_data: MarkAttendanceRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let date = match parse_date(&attendance_data.date) {
        Ok(date) => date,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::AttendanceInvalid, msg)));
        }
    };

    let class_id = attendance_data.class_id;
    if let Err(resp) = check_class_teaching_permission(&storage, request, class_id).await {
        return Ok(resp);
    }

    // 没有提交状态的学生保持原样，不属于该班级的学生被忽略
    match storage
        .mark_attendance(class_id, date, attendance_data.records)
        .await
    {
        Ok(result) => {
            info!(
                "Attendance for class {} on {} saved by user {:?}",
                class_id,
                date,
                RequireJWT::extract_user_id(request)
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                result,
                "Attendance saved successfully",
            )))
        }
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::AttendanceInvalid,
            "Failed to save attendance",
        )),
    }
}
