use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ParentService, check_phone, write_error_code};
use crate::models::parents::requests::CreateParentRequest;
use crate::models::{ApiResponse, portal_error_response};
use crate::services::validate_person;

pub async fn create_parent(
    service: &ParentService,
    request: &HttpRequest,
    parent_data: CreateParentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(resp) = validate_person(&parent_data.full_name(), &parent_data.email)
        .and_then(|_| check_phone(&parent_data.phone))
    {
        return Ok(resp);
    }

    match storage.create_parent(parent_data).await {
        Ok(parent) => {
            info!(
                "Parent {} created with {} linked children",
                parent.parent.id,
                parent.children.len()
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(parent, "Parent created successfully")))
        }
        Err(e) => Ok(portal_error_response(
            &e,
            write_error_code(&e),
            "Failed to create parent",
        )),
    }
}
