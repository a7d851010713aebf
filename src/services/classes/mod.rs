pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod mine;
pub mod roll_numbers;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::classes::requests::{
    ClassRequest, CreateClassRequest, UpdateClassRequest, UpdateRollNumbersRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct ClassService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 获取班级列表
    pub async fn list_classes(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_classes(self, request).await
    }

    pub async fn create_class(
        &self,
        req: &HttpRequest,
        class_data: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(self, req, class_data).await
    }

    // 根据班级 ID 获取班级详情（班主任与学生）
    pub async fn get_class(&self, req: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
        get::get_class(self, req, class_id).await
    }

    // 更新班级信息
    pub async fn update_class(
        &self,
        req: &HttpRequest,
        class_id: i64,
        update_data: UpdateClassRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_class(self, req, class_id, update_data).await
    }

    // 批量更新座号
    pub async fn update_roll_numbers(
        &self,
        req: &HttpRequest,
        class_id: i64,
        update_data: UpdateRollNumbersRequest,
    ) -> ActixResult<HttpResponse> {
        roll_numbers::update_roll_numbers(self, req, class_id, update_data).await
    }

    // 根据班级 ID 删除班级
    pub async fn delete_class(
        &self,
        req: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_class(self, req, class_id).await
    }

    // 教师任课的班级
    pub async fn list_my_classes(&self, req: &HttpRequest) -> ActixResult<HttpResponse> {
        mine::list_my_classes(self, req).await
    }
}

// 班级名称必填
fn check_class_name(class_data: &ClassRequest) -> Result<(), HttpResponse> {
    if class_data.name.trim().is_empty() {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ClassNameInvalid,
            "Class name is required",
        )));
    }
    Ok(())
}
