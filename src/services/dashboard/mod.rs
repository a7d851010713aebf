pub mod admin;
pub mod parent;
pub mod student;
pub mod teacher;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct DashboardService {
    storage: Option<Arc<dyn Storage>>,
}

impl DashboardService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 管理员首页统计
    pub async fn admin_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        admin::admin_dashboard(self, request).await
    }

    pub async fn teacher_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        teacher::teacher_dashboard(self, request).await
    }

    pub async fn student_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        student::student_dashboard(self, request).await
    }

    pub async fn parent_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        parent::parent_dashboard(self, request).await
    }
}
