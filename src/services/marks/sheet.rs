use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MarkService;
use crate::errors::{PortalError, Result};
use crate::models::marks::responses::TeacherGradingSheetResponse;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::check_class_teaching_permission;
use crate::storage::Storage;

pub async fn grading_sheet(
    service: &MarkService,
    request: &HttpRequest,
    exam_id: i64,
    class_id: i64,
    subject_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(resp) = check_class_teaching_permission(&storage, request, class_id).await {
        return Ok(resp);
    }

    match collect(&storage, exam_id, class_id, subject_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Grading sheet retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::MarksInvalid,
            "Failed to load grading sheet",
        )),
    }
}

async fn collect(
    storage: &Arc<dyn Storage>,
    exam_id: i64,
    class_id: i64,
    subject_id: i64,
) -> Result<TeacherGradingSheetResponse> {
    let exam = storage
        .get_exam_by_id(exam_id)
        .await?
        .ok_or_else(|| PortalError::not_found("Exam not found"))?;
    let class = storage
        .get_class_by_id(class_id)
        .await?
        .ok_or_else(|| PortalError::not_found("Class not found"))?;
    let subject = storage
        .get_subject_by_id(subject_id)
        .await?
        .ok_or_else(|| PortalError::not_found("Subject not found"))?;
    if subject.class_id != class.id {
        return Err(PortalError::validation(
            "Subject does not belong to this class",
        ));
    }

    let students = storage.list_students_by_class(class.id).await?;
    let marks: HashMap<i64, f64> = storage
        .list_marks_by_exam_subject(exam.id, subject.id)
        .await?
        .into_iter()
        .map(|m| (m.student_id, m.marks_obtained))
        .collect();

    Ok(TeacherGradingSheetResponse {
        exam,
        class,
        subject,
        students,
        marks,
    })
}
