use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::reports::requests::{
    CreateReportRequest, MonthlyParams, ReportListParams, StatisticsParams,
};
use crate::models::users::entities::UserRole;
use crate::services::ReportService;
use crate::utils::SafeIDI64;

// 懒加载的全局 ReportService 实例
static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

pub async fn get_dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.get_dashboard(&req).await
}

pub async fn get_statistics(
    req: HttpRequest,
    query: web::Query<StatisticsParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.get_statistics(query.into_inner(), &req).await
}

pub async fn get_monthly_report(
    req: HttpRequest,
    query: web::Query<MonthlyParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .get_monthly_report(query.into_inner(), &req)
        .await
}

pub async fn export_monthly_pdf(
    req: HttpRequest,
    query: web::Query<MonthlyParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .export_monthly_pdf(query.into_inner(), &req)
        .await
}

pub async fn list_reports(
    req: HttpRequest,
    query: web::Query<ReportListParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.list_reports(query.into_inner(), &req).await
}

pub async fn create_report(
    req: HttpRequest,
    body: web::Json<CreateReportRequest>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.create_report(body.into_inner(), &req).await
}

pub async fn get_report(req: HttpRequest, report_id: SafeIDI64) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.get_report(report_id.0, &req).await
}

pub async fn delete_report(req: HttpRequest, report_id: SafeIDI64) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.delete_report(report_id.0, &req).await
}

// 配置路由
pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v1/dashboard")
            .route(web::get().to(get_dashboard))
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT),
    );
    cfg.service(
        web::scope("/api/v1/reports")
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .service(web::resource("/statistics").route(web::get().to(get_statistics)))
            .service(web::resource("/monthly").route(web::get().to(get_monthly_report)))
            .service(web::resource("/monthly/pdf").route(web::get().to(export_monthly_pdf)))
            .service(
                web::resource("")
                    .route(web::get().to(list_reports))
                    .route(web::post().to(create_report)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_report))
                    // 删除报表 - 仅管理员
                    .route(
                        web::delete()
                            .to(delete_report)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
