//! 路径参数提取器
//!
//! 将路径中的 ID 解析为正整数，失败时直接返回统一格式的 400 响应。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(name).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                format!("Invalid path parameter '{name}': {raw}"),
            ));
            Err(InternalError::from_response(format!("invalid {name}"), response).into())
        }
    }
}

macro_rules! define_safe_id_extractor {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(parse_positive_id(req, $param).map($name))
                }
            }
        )*
    };
}

define_safe_id_extractor! {
    SafeIDI64 => "id",
    SafeClassIdI64 => "class_id",
    SafeExamIdI64 => "exam_id",
    SafeSubjectIdI64 => "subject_id",
    SafeStudentIdI64 => "student_id",
    SafeRoutineIdI64 => "routine_id",
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_valid_id() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_invalid_id() {
        let req = TestRequest::default()
            .param("class_id", "-3")
            .to_http_request();
        assert!(SafeClassIdI64::extract(&req).await.is_err());

        let req = TestRequest::default()
            .param("class_id", "abc")
            .to_http_request();
        assert!(SafeClassIdI64::extract(&req).await.is_err());
    }
}
