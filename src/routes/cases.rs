use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::cases::requests::{
    CaseActionListParams, CaseListParams, CreateCaseActionRequest, CreateCaseRequest,
    UpdateCaseActionRequest, UpdateCaseRequest,
};
use crate::models::sanctions::requests::{CreateSanctionRequest, UpdateSanctionRequest};
use crate::models::users::entities::UserRole;
use crate::services::CaseService;
use crate::utils::{SafeActionIdI64, SafeIDI64};

// 懒加载的全局 CaseService 实例
static CASE_SERVICE: Lazy<CaseService> = Lazy::new(CaseService::new_lazy);

pub async fn list_cases(
    req: HttpRequest,
    query: web::Query<CaseListParams>,
) -> ActixResult<HttpResponse> {
    CASE_SERVICE.list_cases(query.into_inner(), &req).await
}

pub async fn create_case(
    req: HttpRequest,
    body: web::Json<CreateCaseRequest>,
) -> ActixResult<HttpResponse> {
    CASE_SERVICE.create_case(body.into_inner(), &req).await
}

pub async fn get_case(req: HttpRequest, case_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CASE_SERVICE.get_case(case_id.0, &req).await
}

pub async fn update_case(
    req: HttpRequest,
    case_id: SafeIDI64,
    body: web::Json<UpdateCaseRequest>,
) -> ActixResult<HttpResponse> {
    CASE_SERVICE
        .update_case(case_id.0, body.into_inner(), &req)
        .await
}

pub async fn export_case_pdf(req: HttpRequest, case_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CASE_SERVICE.export_case_pdf(case_id.0, &req).await
}

// 处理记录
pub async fn list_actions(
    req: HttpRequest,
    case_id: SafeIDI64,
    query: web::Query<CaseActionListParams>,
) -> ActixResult<HttpResponse> {
    CASE_SERVICE
        .list_actions(case_id.0, query.into_inner(), &req)
        .await
}

pub async fn create_action(
    req: HttpRequest,
    case_id: SafeIDI64,
    body: web::Json<CreateCaseActionRequest>,
) -> ActixResult<HttpResponse> {
    CASE_SERVICE
        .create_action(case_id.0, body.into_inner(), &req)
        .await
}

pub async fn get_action(
    req: HttpRequest,
    case_id: SafeIDI64,
    action_id: SafeActionIdI64,
) -> ActixResult<HttpResponse> {
    CASE_SERVICE.get_action(case_id.0, action_id.0, &req).await
}

pub async fn update_action(
    req: HttpRequest,
    case_id: SafeIDI64,
    action_id: SafeActionIdI64,
    body: web::Json<UpdateCaseActionRequest>,
) -> ActixResult<HttpResponse> {
    CASE_SERVICE
        .update_action(case_id.0, action_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_action(
    req: HttpRequest,
    case_id: SafeIDI64,
    action_id: SafeActionIdI64,
) -> ActixResult<HttpResponse> {
    CASE_SERVICE
        .delete_action(case_id.0, action_id.0, &req)
        .await
}

// 处分
pub async fn list_sanctions(req: HttpRequest, case_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CASE_SERVICE.list_sanctions(case_id.0, &req).await
}

pub async fn create_sanction(
    req: HttpRequest,
    case_id: SafeIDI64,
    body: web::Json<CreateSanctionRequest>,
) -> ActixResult<HttpResponse> {
    CASE_SERVICE
        .create_sanction(case_id.0, body.into_inner(), &req)
        .await
}

pub async fn update_sanction(
    req: HttpRequest,
    sanction_id: SafeIDI64,
    body: web::Json<UpdateSanctionRequest>,
) -> ActixResult<HttpResponse> {
    CASE_SERVICE
        .update_sanction(sanction_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_sanction(
    req: HttpRequest,
    sanction_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    CASE_SERVICE.delete_sanction(sanction_id.0, &req).await
}

// 配置路由
pub fn configure_case_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/cases")
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_cases))
                    .route(web::post().to(create_case)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_case))
                    .route(web::put().to(update_case)),
            )
            .service(web::resource("/{id}/pdf").route(web::get().to(export_case_pdf)))
            .service(
                web::resource("/{id}/actions")
                    .route(web::get().to(list_actions))
                    .route(web::post().to(create_action)),
            )
            .service(
                web::resource("/{id}/actions/{action_id}")
                    .route(web::get().to(get_action))
                    .route(web::put().to(update_action))
                    .route(web::delete().to(delete_action)),
            )
            .service(
                web::resource("/{id}/sanctions")
                    .route(web::get().to(list_sanctions))
                    .route(web::post().to(create_sanction)),
            ),
    );
    cfg.service(
        web::scope("/api/v1/sanctions")
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_sanction))
                    .route(web::delete().to(delete_sanction)),
            ),
    );
}
