use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use crate::models::teachers::requests::{TeacherListQuery, TeacherQueryParams};
use crate::models::{ApiResponse, ErrorCode, portal_error_response};

pub async fn list_teachers(
    service: &TeacherService,
    request: &HttpRequest,
    query: TeacherQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage
        .list_teachers_with_pagination(TeacherListQuery::from(query))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Teacher list retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve teacher list",
        )),
    }
}
