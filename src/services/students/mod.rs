pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::PortalError;
use crate::models::students::requests::{
    CreateStudentRequest, StudentQueryParams, UpdateStudentRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 学生列表（按姓名或学号搜索，可按班级过滤）
    pub async fn list_students(
        &self,
        request: &HttpRequest,
        query: StudentQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, request, query).await
    }

    pub async fn get_student(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::get_student(self, request, id).await
    }

    pub async fn create_student(
        &self,
        request: &HttpRequest,
        student_data: CreateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, request, student_data).await
    }

    pub async fn update_student(
        &self,
        request: &HttpRequest,
        id: i64,
        update_data: UpdateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, request, id, update_data).await
    }

    pub async fn delete_student(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_student(self, request, id).await
    }
}

// 学号必填
fn check_admission_no(admission_no: &str) -> Result<(), HttpResponse> {
    if admission_no.trim().is_empty() {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::StudentAdmissionInvalid,
            "Admission number is required",
        )));
    }
    Ok(())
}

// 写操作失败时的错误码
fn write_error_code(err: &PortalError) -> ErrorCode {
    match err {
        PortalError::Conflict(msg) if msg.starts_with("Admission") => {
            ErrorCode::StudentAdmissionAlreadyExists
        }
        PortalError::Conflict(_) => ErrorCode::UserEmailAlreadyExists,
        _ => ErrorCode::BadRequest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_code() {
        assert_eq!(
            write_error_code(&PortalError::conflict("Admission number already exists")),
            ErrorCode::StudentAdmissionAlreadyExists
        );
        assert_eq!(
            write_error_code(&PortalError::conflict("Email is already in use")),
            ErrorCode::UserEmailAlreadyExists
        );
        assert_eq!(
            write_error_code(&PortalError::validation("Class does not exist")),
            ErrorCode::BadRequest
        );
    }

    #[test]
    fn test_blank_admission_rejected() {
        assert!(check_admission_no("  ").is_err());
        assert!(check_admission_no("ADM-1").is_ok());
    }
}
