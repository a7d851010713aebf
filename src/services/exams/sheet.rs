use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExamService;
use crate::errors::Result;
use crate::models::exams::entities::Exam;
use crate::models::exams::requests::GradingSheetQuery;
use crate::models::exams::responses::GradingSheetResponse;
use crate::models::marks::entities::{Mark, StudentMarkRow};
use crate::models::students::entities::Student;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::storage::Storage;

pub async fn grading_sheet(
    service: &ExamService,
    request: &HttpRequest,
    exam_id: i64,
    query: GradingSheetQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let exam = match storage.get_exam_by_id(exam_id).await {
        Ok(Some(exam)) => exam,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ExamNotFound,
                "Exam not found",
            )));
        }
        Err(e) => {
            return Ok(portal_error_response(
                &e,
                ErrorCode::InternalServerError,
                "Failed to load exam",
            ));
        }
    };

    match collect(&storage, exam, query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Grading sheet retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to load grading sheet",
        )),
    }
}

async fn collect(
    storage: &Arc<dyn Storage>,
    exam: Exam,
    query: GradingSheetQuery,
) -> Result<GradingSheetResponse> {
    let classes = storage.list_class_options().await?;
    let mut subjects = storage.list_subjects().await?;
    subjects.sort_by(|a, b| a.subject.name.cmp(&b.subject.name));

    // 选定班级与科目后才加载学生
    let students = match (query.class_id, query.subject_id) {
        (Some(class_id), Some(subject_id)) => {
            let students = storage.list_students_by_class(class_id).await?;
            let marks = storage
                .list_marks_by_exam_subject(exam.id, subject_id)
                .await?;
            Some(mark_rows(students, marks))
        }
        _ => None,
    };

    Ok(GradingSheetResponse {
        exam,
        classes,
        subjects,
        students,
    })
}

fn mark_rows(students: Vec<Student>, marks: Vec<Mark>) -> Vec<StudentMarkRow> {
    let by_student: HashMap<i64, Mark> = marks.into_iter().map(|m| (m.student_id, m)).collect();
    students
        .into_iter()
        .map(|student| {
            let mark = by_student.get(&student.id);
            StudentMarkRow {
                student_id: student.id,
                full_name: student.full_name,
                roll_number: student.roll_number,
                marks_obtained: mark.map(|m| m.marks_obtained),
                total_marks: mark.map(|m| m.total_marks),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_rows_join_existing_marks() {
        let students = vec![
            Student {
                id: 1,
                user_id: None,
                full_name: "Ann".to_string(),
                admission_no: "S1".to_string(),
                roll_number: Some("1".to_string()),
                class_id: Some(1),
                parent_id: None,
            },
            Student {
                id: 2,
                user_id: None,
                full_name: "Tom".to_string(),
                admission_no: "S2".to_string(),
                roll_number: None,
                class_id: Some(1),
                parent_id: None,
            },
        ];
        let marks = vec![Mark {
            id: 9,
            student_id: 2,
            exam_id: 1,
            subject_id: 1,
            marks_obtained: 64.0,
            total_marks: 100.0,
            grade: None,
        }];

        let rows = mark_rows(students, marks);
        assert_eq!(rows[0].marks_obtained, None);
        assert_eq!(rows[1].marks_obtained, Some(64.0));
        assert_eq!(rows[1].total_marks, Some(100.0));
    }
}
