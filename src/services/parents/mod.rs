pub mod children;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::PortalError;
use crate::models::parents::requests::{
    CreateParentRequest, ParentQueryParams, UpdateParentRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::non_blank;

pub struct ParentService {
    storage: Option<Arc<dyn Storage>>,
}

impl ParentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_parents(
        &self,
        request: &HttpRequest,
        query: ParentQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_parents(self, request, query).await
    }

    pub async fn get_parent(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::get_parent(self, request, id).await
    }

    // 创建家长并关联孩子
    pub async fn create_parent(
        &self,
        request: &HttpRequest,
        parent_data: CreateParentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_parent(self, request, parent_data).await
    }

    pub async fn update_parent(
        &self,
        request: &HttpRequest,
        id: i64,
        update_data: UpdateParentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_parent(self, request, id, update_data).await
    }

    pub async fn delete_parent(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_parent(self, request, id).await
    }

    // 家长查看自己孩子的详情
    pub async fn get_child_detail(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        children::get_child_detail(self, request, student_id).await
    }
}

// 电话必填
fn check_phone(phone: &str) -> Result<(), HttpResponse> {
    if non_blank(Some(phone)).is_none() {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ParentPhoneInvalid,
            "Phone number is required",
        )));
    }
    Ok(())
}

fn write_error_code(err: &PortalError) -> ErrorCode {
    match err {
        PortalError::Conflict(_) => ErrorCode::UserEmailAlreadyExists,
        _ => ErrorCode::BadRequest,
    }
}
