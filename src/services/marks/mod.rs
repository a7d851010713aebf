pub mod mine;
pub mod overview;
pub mod sheet;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::marks::requests::UpdateMarksRequest;
use crate::storage::Storage;

pub struct MarkService {
    storage: Option<Arc<dyn Storage>>,
}

impl MarkService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 录入成绩
    pub async fn update_marks(
        &self,
        request: &HttpRequest,
        marks_data: UpdateMarksRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_marks(self, request, marks_data).await
    }

    // 教师成绩总览
    pub async fn overview(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        overview::marks_overview(self, request).await
    }

    // 教师录分表
    pub async fn grading_sheet(
        &self,
        request: &HttpRequest,
        exam_id: i64,
        class_id: i64,
        subject_id: i64,
    ) -> ActixResult<HttpResponse> {
        sheet::grading_sheet(self, request, exam_id, class_id, subject_id).await
    }

    // 学生本人成绩
    pub async fn my_grades(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        mine::my_grades(self, request).await
    }
}
