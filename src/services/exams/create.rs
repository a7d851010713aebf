use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use tracing::info;

use super::ExamService;
use crate::models::exams::entities::NewExam;
use crate::models::exams::requests::CreateExamRequest;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::utils::{non_blank, parse_date};

pub async fn create_exam(
    service: &ExamService,
    request: &HttpRequest,
    exam_data: CreateExamRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let exam = match validate_exam(exam_data) {
        Ok(exam) => exam,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ExamInvalid, msg)));
        }
    };

    match storage.create_exam(exam).await {
        Ok(exam) => {
            info!("Exam {} created: {}", exam.id, exam.name);
            Ok(HttpResponse::Created().json(ApiResponse::success(exam, "Exam created successfully")))
        }
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::ExamInvalid,
            "Failed to create exam",
        )),
    }
}

fn optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, String> {
    non_blank(value).map(|raw| parse_date(&raw)).transpose()
}

fn validate_exam(data: CreateExamRequest) -> Result<NewExam, String> {
    let Some(name) = non_blank(Some(data.name.as_str())) else {
        return Err("Exam name is required".to_string());
    };
    let start_date = optional_date(data.start_date.as_deref())?;
    let end_date = optional_date(data.end_date.as_deref())?;
    if let (Some(start), Some(end)) = (start_date, end_date)
        && end < start
    {
        return Err("End date cannot be before start date".to_string());
    }

    Ok(NewExam {
        name,
        term: non_blank(data.term.as_deref()),
        start_date,
        end_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start: Option<&str>, end: Option<&str>) -> CreateExamRequest {
        CreateExamRequest {
            name: " Final ".to_string(),
            term: Some(" ".to_string()),
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
        }
    }

    #[test]
    fn test_optional_fields() {
        let exam = validate_exam(request(None, Some(""))).unwrap();
        assert_eq!(exam.name, "Final");
        assert_eq!(exam.term, None);
        assert_eq!(exam.end_date, None);
    }

    #[test]
    fn test_date_order() {
        assert!(validate_exam(request(Some("2025-06-10"), Some("2025-06-01"))).is_err());
        let exam = validate_exam(request(Some("2025-06-01"), Some("2025-06-01"))).unwrap();
        assert_eq!(exam.start_date, exam.end_date);
    }

    #[test]
    fn test_name_required_and_bad_date() {
        let mut data = request(None, None);
        data.name = "   ".to_string();
        assert!(validate_exam(data).is_err());
        assert!(validate_exam(request(Some("June 1"), None)).is_err());
    }
}
