use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::classes::requests::UpdateRollNumbersRequest;
use crate::models::classes::responses::RollNumberUpdateResponse;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};

pub async fn update_roll_numbers(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    update_data: UpdateRollNumbersRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_class_by_id(class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => {
            return Ok(portal_error_response(
                &e,
                ErrorCode::InternalServerError,
                "Failed to update roll numbers",
            ));
        }
    }

    // 只更新属于该班级的学生
    match storage
        .update_roll_numbers(class_id, update_data.roll_numbers)
        .await
    {
        Ok(updated) => {
            info!("Updated {} roll numbers in class {}", updated, class_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                RollNumberUpdateResponse { updated },
                "Roll numbers updated successfully",
            )))
        }
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::BadRequest,
            "Failed to update roll numbers",
        )),
    }
}
