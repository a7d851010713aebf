use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::classes::requests::{
    CreateClassRequest, UpdateClassRequest, UpdateRollNumbersRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::ClassService;
use crate::utils::SafeClassIdI64;

// 懒加载的全局 ClassService 实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);

pub async fn list_classes(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(&req).await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.create_class(&req, class_data.into_inner()).await
}

pub async fn list_my_classes(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_my_classes(&req).await
}

pub async fn get_class(req: HttpRequest, class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(&req, class_id.0).await
}

pub async fn update_class(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    update_data: web::Json<UpdateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .update_class(&req, class_id.0, update_data.into_inner())
        .await
}

pub async fn update_roll_numbers(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    update_data: web::Json<UpdateRollNumbersRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .update_roll_numbers(&req, class_id.0, update_data.into_inner())
        .await
}

pub async fn delete_class(
    req: HttpRequest,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.delete_class(&req, class_id.0).await
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_classes)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_class)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            // 固定路径须在 /{class_id} 之前注册
            .service(
                web::resource("/mine").route(
                    web::get()
                        .to(list_my_classes)
                        .wrap(middlewares::RequireRole::new_any(
                            UserRole::teacher_portal_roles(),
                        )),
                ),
            )
            .service(
                web::resource("/{class_id}")
                    .route(
                        web::get()
                            .to(get_class)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::put()
                            .to(update_class)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_class)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{class_id}/roll-numbers").route(
                    web::put()
                        .to(update_roll_numbers)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );
}
