pub mod create;
pub mod delete;
pub mod list;
pub mod sheet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::exams::requests::{CreateExamRequest, GradingSheetQuery};
use crate::storage::Storage;

pub struct ExamService {
    storage: Option<Arc<dyn Storage>>,
}

impl ExamService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_exams(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_exams(self, request).await
    }

    pub async fn create_exam(
        &self,
        request: &HttpRequest,
        exam_data: CreateExamRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_exam(self, request, exam_data).await
    }

    // 删除考试及其成绩
    pub async fn delete_exam(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_exam(self, request, id).await
    }

    // 录分表
    pub async fn grading_sheet(
        &self,
        request: &HttpRequest,
        exam_id: i64,
        query: GradingSheetQuery,
    ) -> ActixResult<HttpResponse> {
        sheet::grading_sheet(self, request, exam_id, query).await
    }
}
