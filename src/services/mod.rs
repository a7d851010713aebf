pub mod attendance;
pub mod auth;
pub mod classes;
pub mod dashboard;
pub mod exams;
pub mod marks;
pub mod parents;
pub mod schedule;
pub mod students;
pub mod subjects;
pub mod teachers;

pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use dashboard::DashboardService;
pub use exams::ExamService;
pub use marks::MarkService;
pub use parents::ParentService;
pub use schedule::ScheduleService;
pub use students::StudentService;
pub use subjects::SubjectService;
pub use teachers::TeacherService;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::{debug, error};

use crate::cache::ObjectCache;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    parents::entities::Parent,
    students::entities::Student,
    teachers::entities::Teacher,
    users::entities::{User, UserRole},
};
use crate::storage::Storage;
use crate::utils::{validate_email, validate_full_name};

/// 从 app_data 中取出存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Storage not found in app data"))
}

/// 当前登录用户，缺失时返回 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        ))
    })
}

fn internal_error(message: String) -> HttpResponse {
    error!("{}", message);
    HttpResponse::InternalServerError()
        .json(ApiResponse::error_empty(ErrorCode::InternalServerError, message))
}

fn profile_not_found(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::ProfileNotFound, message))
}

/// 当前用户的教师档案
pub(crate) async fn current_teacher(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
) -> Result<Teacher, HttpResponse> {
    let user = current_user(request)?;
    match storage.get_teacher_by_user_id(user.id).await {
        Ok(Some(teacher)) => Ok(teacher),
        Ok(None) => Err(profile_not_found("Teacher profile not found")),
        Err(e) => Err(internal_error(format!("Failed to load teacher profile: {e}"))),
    }
}

/// 当前用户的学生档案
pub(crate) async fn current_student(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
) -> Result<Student, HttpResponse> {
    let user = current_user(request)?;
    match storage.get_student_by_user_id(user.id).await {
        Ok(Some(student)) => Ok(student),
        Ok(None) => Err(profile_not_found("Student profile not found")),
        Err(e) => Err(internal_error(format!("Failed to load student profile: {e}"))),
    }
}

/// 当前用户的家长档案
pub(crate) async fn current_parent(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
) -> Result<Parent, HttpResponse> {
    let user = current_user(request)?;
    match storage.get_parent_by_user_id(user.id).await {
        Ok(Some(parent)) => Ok(parent),
        Ok(None) => Err(profile_not_found("Parent profile not found")),
        Err(e) => Err(internal_error(format!("Failed to load parent profile: {e}"))),
    }
}

/// 教学操作的班级权限：管理员不受限，教师须在该班级有课
pub(crate) async fn check_class_teaching_permission(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
    class_id: i64,
) -> Result<(), HttpResponse> {
    match RequireJWT::extract_user_role(request) {
        Some(UserRole::Admin) => Ok(()),
        Some(UserRole::Teacher) => {
            let teacher = current_teacher(storage, request).await?;
            match storage.teacher_teaches_class(teacher.id, class_id).await {
                Ok(true) => Ok(()),
                Ok(false) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::ClassPermissionDenied,
                    "You do not teach this class",
                ))),
                Err(e) => Err(internal_error(format!(
                    "Failed to check class permission: {e}"
                ))),
            }
        }
        _ => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Access denied",
        ))),
    }
}

/// 校验姓名与邮箱
pub(crate) fn validate_person(full_name: &str, email: &str) -> Result<(), HttpResponse> {
    if let Err(msg) = validate_full_name(full_name) {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }
    if let Err(msg) = validate_email(email) {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }
    Ok(())
}

/// 使账号的缓存失效，账号的角色、姓名或邮箱被管理员修改时调用
pub(crate) async fn invalidate_user_cache(
    request: &HttpRequest,
    storage: &Arc<dyn Storage>,
    user_id: Option<i64>,
) {
    let Some(user_id) = user_id else {
        return;
    };
    let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>() else {
        return;
    };
    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => {
            debug!("Invalidating cached user {}", user.id);
            cache.remove(&user.cache_key()).await;
        }
        Ok(None) => {}
        Err(e) => error!("Failed to load user {} for cache invalidation: {}", user_id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_person() {
        assert!(validate_person("Ada Lovelace", "ada@school.test").is_ok());

        let resp = validate_person("A", "ada@school.test").unwrap_err();
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let resp = validate_person("Ada", "ada").unwrap_err();
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_current_user_missing() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        let resp = current_user(&req).unwrap_err();
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }
}
