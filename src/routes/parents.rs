use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::parents::requests::{
    CreateParentRequest, ParentQueryParams, UpdateParentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::ParentService;
use crate::utils::{SafeIDI64, SafeStudentIdI64};

static PARENT_SERVICE: Lazy<ParentService> = Lazy::new(ParentService::new_lazy);

pub async fn list_parents(
    req: HttpRequest,
    query: web::Query<ParentQueryParams>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.list_parents(&req, query.into_inner()).await
}

pub async fn create_parent(
    req: HttpRequest,
    parent_data: web::Json<CreateParentRequest>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE
        .create_parent(&req, parent_data.into_inner())
        .await
}

pub async fn get_parent(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.get_parent(&req, id.0).await
}

pub async fn update_parent(
    req: HttpRequest,
    id: SafeIDI64,
    update_data: web::Json<UpdateParentRequest>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE
        .update_parent(&req, id.0, update_data.into_inner())
        .await
}

pub async fn delete_parent(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.delete_parent(&req, id.0).await
}

pub async fn get_child_detail(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.get_child_detail(&req, student_id.0).await
}

// 配置路由
pub fn configure_parents_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/parents")
            .wrap(middlewares::RequireJWT)
            .service(
                // 家长查看自己孩子的详情
                web::resource("/me/children/{student_id}").route(
                    web::get()
                        .to(get_child_detail)
                        .wrap(middlewares::RequireRole::new_any(UserRole::parent_roles())),
                ),
            )
            .service(
                web::resource("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route(web::get().to(list_parents))
                    .route(web::post().to(create_parent)),
            )
            .service(
                web::resource("/{id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route(web::get().to(get_parent))
                    .route(web::put().to(update_parent))
                    .route(web::delete().to(delete_parent)),
            ),
    );
}
