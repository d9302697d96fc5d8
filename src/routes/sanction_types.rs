use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::ForceDeleteQuery;
use crate::models::sanction_types::requests::{
    CreateSanctionTypeRequest, UpdateSanctionTypeRequest,
};
use crate::models::users::entities::UserRole;
use crate::models::violations::requests::CatalogListParams;
use crate::services::SanctionTypeService;
use crate::utils::SafeIDI64;

// 懒加载的全局 SanctionTypeService 实例
static SANCTION_TYPE_SERVICE: Lazy<SanctionTypeService> =
    Lazy::new(SanctionTypeService::new_lazy);

pub async fn list_sanction_types(
    req: HttpRequest,
    query: web::Query<CatalogListParams>,
) -> ActixResult<HttpResponse> {
    SANCTION_TYPE_SERVICE
        .list_sanction_types(query.into_inner(), &req)
        .await
}

pub async fn create_sanction_type(
    req: HttpRequest,
    body: web::Json<CreateSanctionTypeRequest>,
) -> ActixResult<HttpResponse> {
    SANCTION_TYPE_SERVICE
        .create_sanction_type(body.into_inner(), &req)
        .await
}

pub async fn update_sanction_type(
    req: HttpRequest,
    sanction_type_id: SafeIDI64,
    body: web::Json<UpdateSanctionTypeRequest>,
) -> ActixResult<HttpResponse> {
    SANCTION_TYPE_SERVICE
        .update_sanction_type(sanction_type_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_sanction_type(
    req: HttpRequest,
    sanction_type_id: SafeIDI64,
    query: web::Query<ForceDeleteQuery>,
) -> ActixResult<HttpResponse> {
    SANCTION_TYPE_SERVICE
        .delete_sanction_type(sanction_type_id.0, query.force, &req)
        .await
}

// 配置路由
pub fn configure_sanction_type_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/sanction-types")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_sanction_types))
                    .route(
                        web::post()
                            .to(create_sanction_type)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_sanction_type))
                    .route(web::delete().to(delete_sanction_type))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            ),
    );
}
