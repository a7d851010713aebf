use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassService, check_class_name};
use crate::models::classes::requests::CreateClassRequest;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(resp) = check_class_name(&class_data) {
        return Ok(resp);
    }

    match storage.create_class(class_data).await {
        Ok(class) => {
            info!("Class {} created: {}", class.id, class.name);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(class, "Class created successfully")))
        }
        // 班主任不存在时由外键约束拒绝
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::BadRequest,
            "Class creation failed",
        )),
    }
}
