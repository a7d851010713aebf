use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DashboardService;
use crate::models::dashboard::responses::ParentDashboardResponse;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::current_parent;

pub async fn parent_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let parent = match current_parent(&storage, request).await {
        Ok(parent) => parent,
        Err(resp) => return Ok(resp),
    };

    match storage.list_children_of_parent(parent.id).await {
        Ok(children) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ParentDashboardResponse { parent, children },
            "Dashboard retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to load children",
        )),
    }
}
