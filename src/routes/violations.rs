use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::ForceDeleteQuery;
use crate::models::users::entities::UserRole;
use crate::models::violations::requests::{
    CatalogListParams, CreateViolationCategoryRequest, CreateViolationRequest,
    CreateViolationTypeRequest, UpdateViolationCategoryRequest, UpdateViolationRequest,
    UpdateViolationTypeRequest, ViolationListParams,
};
use crate::services::ViolationService;
use crate::utils::SafeIDI64;

// 懒加载的全局 ViolationService 实例
static VIOLATION_SERVICE: Lazy<ViolationService> = Lazy::new(ViolationService::new_lazy);

// 违规分类
pub async fn list_categories(
    req: HttpRequest,
    query: web::Query<CatalogListParams>,
) -> ActixResult<HttpResponse> {
    VIOLATION_SERVICE.list_categories(query.into_inner(), &req).await
}

pub async fn create_category(
    req: HttpRequest,
    body: web::Json<CreateViolationCategoryRequest>,
) -> ActixResult<HttpResponse> {
    VIOLATION_SERVICE.create_category(body.into_inner(), &req).await
}

pub async fn update_category(
    req: HttpRequest,
    category_id: SafeIDI64,
    body: web::Json<UpdateViolationCategoryRequest>,
) -> ActixResult<HttpResponse> {
    VIOLATION_SERVICE
        .update_category(category_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_category(
    req: HttpRequest,
    category_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    VIOLATION_SERVICE.delete_category(category_id.0, &req).await
}

// 违规项
pub async fn list_violations(
    req: HttpRequest,
    query: web::Query<ViolationListParams>,
) -> ActixResult<HttpResponse> {
    VIOLATION_SERVICE.list_violations(query.into_inner(), &req).await
}

pub async fn create_violation(
    req: HttpRequest,
    body: web::Json<CreateViolationRequest>,
) -> ActixResult<HttpResponse> {
    VIOLATION_SERVICE.create_violation(body.into_inner(), &req).await
}

pub async fn get_violation(req: HttpRequest, violation_id: SafeIDI64) -> ActixResult<HttpResponse> {
    VIOLATION_SERVICE.get_violation(violation_id.0, &req).await
}

pub async fn update_violation(
    req: HttpRequest,
    violation_id: SafeIDI64,
    body: web::Json<UpdateViolationRequest>,
) -> ActixResult<HttpResponse> {
    VIOLATION_SERVICE
        .update_violation(violation_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_violation(
    req: HttpRequest,
    violation_id: SafeIDI64,
    query: web::Query<ForceDeleteQuery>,
) -> ActixResult<HttpResponse> {
    VIOLATION_SERVICE
        .delete_violation(violation_id.0, query.force, &req)
        .await
}

// 旧版违规类型
pub async fn list_violation_types(
    req: HttpRequest,
    query: web::Query<CatalogListParams>,
) -> ActixResult<HttpResponse> {
    VIOLATION_SERVICE
        .list_violation_types(query.into_inner(), &req)
        .await
}

pub async fn create_violation_type(
    req: HttpRequest,
    body: web::Json<CreateViolationTypeRequest>,
) -> ActixResult<HttpResponse> {
    VIOLATION_SERVICE
        .create_violation_type(body.into_inner(), &req)
        .await
}

pub async fn update_violation_type(
    req: HttpRequest,
    type_id: SafeIDI64,
    body: web::Json<UpdateViolationTypeRequest>,
) -> ActixResult<HttpResponse> {
    VIOLATION_SERVICE
        .update_violation_type(type_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_violation_type(
    req: HttpRequest,
    type_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    VIOLATION_SERVICE.delete_violation_type(type_id.0, &req).await
}

fn admin_only() -> middlewares::RequireRole {
    middlewares::RequireRole::new_any(UserRole::admin_roles())
}

// 配置路由：读取对所有登录用户开放，写入仅管理员
pub fn configure_violation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/violation-categories")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_categories))
                    .route(web::post().to(create_category).wrap(admin_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_category))
                    .route(web::delete().to(delete_category))
                    .wrap(admin_only()),
            ),
    );
    cfg.service(
        web::scope("/api/v1/violations")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_violations))
                    .route(web::post().to(create_violation).wrap(admin_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_violation))
                    .route(web::put().to(update_violation).wrap(admin_only()))
                    .route(web::delete().to(delete_violation).wrap(admin_only())),
            ),
    );
    cfg.service(
        web::scope("/api/v1/violation-types")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_violation_types))
                    .route(web::post().to(create_violation_type).wrap(admin_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_violation_type))
                    .route(web::delete().to(delete_violation_type))
                    .wrap(admin_only()),
            ),
    );
}
