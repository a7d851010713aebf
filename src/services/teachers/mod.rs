pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::teachers::requests::{
    CreateTeacherRequest, TeacherQueryParams, UpdateTeacherRequest,
};
use crate::storage::Storage;

pub struct TeacherService {
    storage: Option<Arc<dyn Storage>>,
}

impl TeacherService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_teachers(
        &self,
        request: &HttpRequest,
        query: TeacherQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_teachers(self, request, query).await
    }

    pub async fn get_teacher(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::get_teacher(self, request, id).await
    }

    // 创建教师（已有账号则提升为教师）
    pub async fn create_teacher(
        &self,
        request: &HttpRequest,
        teacher_data: CreateTeacherRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_teacher(self, request, teacher_data).await
    }

    pub async fn update_teacher(
        &self,
        request: &HttpRequest,
        id: i64,
        update_data: UpdateTeacherRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_teacher(self, request, id, update_data).await
    }

    // 删除教师及其账号
    pub async fn delete_teacher(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_teacher(self, request, id).await
    }
}
