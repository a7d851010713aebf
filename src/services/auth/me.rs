use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::AuthService;
use crate::models::auth::responses::CurrentUserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;

pub async fn handle_get_current_user(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let profile_id = match storage.get_profile_id(&user).await {
        Ok(id) => id,
        Err(e) => {
            error!("Failed to load profile of user {}: {}", user.id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load user profile: {e}"),
                )),
            );
        }
    };

    let portal = user.role.portal_path().to_string();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CurrentUserResponse {
            user,
            profile_id,
            portal,
        },
        "User information retrieved successfully",
    )))
}
