use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MarkService;
use crate::errors::Result;
use crate::models::marks::responses::TeacherMarksOverviewResponse;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::current_teacher;
use crate::storage::Storage;

pub async fn marks_overview(
    service: &MarkService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let teacher = match current_teacher(&storage, request).await {
        Ok(teacher) => teacher,
        Err(resp) => return Ok(resp),
    };

    match collect(&storage, teacher.id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Marks overview retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to load marks overview",
        )),
    }
}

async fn collect(
    storage: &Arc<dyn Storage>,
    teacher_id: i64,
) -> Result<TeacherMarksOverviewResponse> {
    Ok(TeacherMarksOverviewResponse {
        exams: storage.list_exam_options().await?,
        classes: storage.list_teacher_classes(teacher_id).await?,
    })
}
