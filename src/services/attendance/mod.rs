pub mod mark;
pub mod mine;
pub mod overview;
pub mod sheet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::attendance::requests::{AttendanceSheetQuery, MarkAttendanceRequest};
use crate::storage::Storage;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttendanceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn overview(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        overview::attendance_overview(self, request).await
    }

    // 某班某日点名表
    pub async fn class_sheet(
        &self,
        request: &HttpRequest,
        class_id: i64,
        query: AttendanceSheetQuery,
    ) -> ActixResult<HttpResponse> {
        sheet::class_sheet(self, request, class_id, query).await
    }

    // 提交考勤
    pub async fn mark_attendance(
        &self,
        request: &HttpRequest,
        attendance_data: MarkAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        mark::mark_attendance(self, request, attendance_data).await
    }

    // 学生本人考勤历史
    pub async fn my_attendance(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        mine::my_attendance(self, request).await
    }
}
