use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::PortalError;
use crate::models::ErrorCode;

// 统一的API响应结构，message 即操作完成后提示给用户的消息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// 将存储层错误转换为 HTTP 响应
///
/// 客户端可修正的错误使用对应状态码与调用方指定的错误码，
/// 其余错误统一为 500，并在消息前加上 `context`。
pub fn portal_error_response(err: &PortalError, code: ErrorCode, context: &str) -> HttpResponse {
    let (status, code) = match err {
        PortalError::Validation(_) | PortalError::DateParse(_) => (StatusCode::BAD_REQUEST, code),
        PortalError::NotFound(_) => (StatusCode::NOT_FOUND, code),
        PortalError::Conflict(_) => (StatusCode::CONFLICT, code),
        PortalError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
        ),
    };

    let message = if err.is_client_error() {
        err.message().to_string()
    } else {
        format!("{context}: {}", err.message())
    };

    HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_maps_to_409() {
        let resp = portal_error_response(
            &PortalError::conflict("Admission number already exists"),
            ErrorCode::StudentAdmissionAlreadyExists,
            "Failed to create student",
        );
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_database_error_maps_to_500() {
        let resp = portal_error_response(
            &PortalError::database_operation("disk full"),
            ErrorCode::StudentNotFound,
            "Failed to create student",
        );
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let resp = portal_error_response(
            &PortalError::validation("Subject does not belong to this class"),
            ErrorCode::RoutineInvalid,
            "Failed to create routine",
        );
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
