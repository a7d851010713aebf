use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StudentService, check_admission_no, write_error_code};
use crate::models::students::requests::CreateStudentRequest;
use crate::models::{ApiResponse, portal_error_response};
use crate::services::validate_person;

pub async fn create_student(
    service: &StudentService,
    request: &HttpRequest,
    student_data: CreateStudentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(resp) = validate_person(&student_data.full_name(), &student_data.email)
        .and_then(|_| check_admission_no(&student_data.admission_no))
    {
        return Ok(resp);
    }

    match storage.create_student(student_data).await {
        Ok(student) => {
            info!(
                "Student {} created: {} ({})",
                student.student.id, student.student.full_name, student.student.admission_no
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(student, "Student created successfully")))
        }
        Err(e) => Ok(portal_error_response(
            &e,
            write_error_code(&e),
            "Failed to create student",
        )),
    }
}
