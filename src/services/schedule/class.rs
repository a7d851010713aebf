use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ScheduleService, group_by_day};
use crate::errors::Result;
use crate::middlewares::RequireJWT;
use crate::models::classes::entities::Class;
use crate::models::schedule::entities::DayOfWeek;
use crate::models::schedule::responses::{ClassScheduleResponse, WeeklyScheduleResponse};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::current_parent;
use crate::storage::Storage;

pub async fn class_schedule(
    service: &ScheduleService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let role = RequireJWT::extract_user_role(request);

    // 家长只能查看孩子所在班级
    if role == Some(UserRole::Parent)
        && let Err(resp) = check_parent_class_permission(&storage, request, class_id).await
    {
        return Ok(resp);
    }

    let class = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => {
            return Ok(portal_error_response(
                &e,
                ErrorCode::InternalServerError,
                "Failed to load class",
            ));
        }
    };

    let message = "Schedule retrieved successfully";
    let result = match role {
        Some(UserRole::Admin) => admin_view(&storage, class)
            .await
            .map(|data| HttpResponse::Ok().json(ApiResponse::success(data, message))),
        _ => weekly_view(&storage, class)
            .await
            .map(|data| HttpResponse::Ok().json(ApiResponse::success(data, message))),
    };

    match result {
        Ok(resp) => Ok(resp),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve schedule",
        )),
    }
}

// 管理员视图附带新增课程表单所需的科目与教师
async fn admin_view(storage: &Arc<dyn Storage>, class: Class) -> Result<ClassScheduleResponse> {
    let routines = storage.list_routines_by_class(class.id).await?;
    let subjects = storage.list_subjects_by_class(class.id).await?;
    let teachers = storage.list_all_teachers().await?;
    Ok(ClassScheduleResponse {
        class,
        days: group_by_day(routines, &DayOfWeek::WEEKDAYS, true),
        subjects,
        teachers,
    })
}

async fn weekly_view(storage: &Arc<dyn Storage>, class: Class) -> Result<WeeklyScheduleResponse> {
    let routines = storage.list_routines_by_class(class.id).await?;
    Ok(WeeklyScheduleResponse {
        class: Some(class),
        days: group_by_day(routines, &DayOfWeek::WEEKDAYS, true),
    })
}

async fn check_parent_class_permission(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
    class_id: i64,
) -> std::result::Result<(), HttpResponse> {
    let parent = current_parent(storage, request).await?;
    match storage.parent_has_child_in_class(parent.id, class_id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "None of your children are in this class",
        ))),
        Err(e) => Err(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to check class permission",
        )),
    }
}
