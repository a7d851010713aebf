use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ScheduleService, group_by_day};
use crate::models::schedule::entities::DayOfWeek;
use crate::models::schedule::responses::WeeklyScheduleResponse;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::current_teacher;

pub async fn my_schedule(
    service: &ScheduleService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let teacher = match current_teacher(&storage, request).await {
        Ok(teacher) => teacher,
        Err(resp) => return Ok(resp),
    };

    // 教师课表覆盖整周，没有课的日子不显示
    match storage.list_routines_by_teacher(teacher.id, None).await {
        Ok(routines) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            WeeklyScheduleResponse {
                class: None,
                days: group_by_day(routines, &DayOfWeek::ALL, false),
            },
            "Schedule retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve schedule",
        )),
    }
}
