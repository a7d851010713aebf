use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DashboardService;
use crate::models::dashboard::responses::TeacherDashboardResponse;
use crate::models::schedule::entities::DayOfWeek;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::current_teacher;

pub async fn teacher_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let teacher = match current_teacher(&storage, request).await {
        Ok(teacher) => teacher,
        Err(resp) => return Ok(resp),
    };

    let class_count = match storage.list_teacher_classes(teacher.id).await {
        Ok(classes) => classes.len() as i64,
        Err(e) => {
            return Ok(portal_error_response(
                &e,
                ErrorCode::InternalServerError,
                "Failed to load classes",
            ));
        }
    };

    // 今日课程按开始时间排序
    let day = DayOfWeek::today();
    match storage.list_routines_by_teacher(teacher.id, Some(day)).await {
        Ok(today_routines) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TeacherDashboardResponse {
                teacher,
                class_count,
                day,
                today_routines,
            },
            "Dashboard retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to load today's routines",
        )),
    }
}
