use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ParentService;
use crate::models::parents::requests::{ParentListQuery, ParentQueryParams};
use crate::models::{ApiResponse, ErrorCode, portal_error_response};

pub async fn list_parents(
    service: &ParentService,
    request: &HttpRequest,
    query: ParentQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage
        .list_parents_with_pagination(ParentListQuery::from(query))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Parent list retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve parent list",
        )),
    }
}
