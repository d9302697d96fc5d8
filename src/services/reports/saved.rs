use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ReportService;
use super::monthly::{check_month, collect_statistics};
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    reports::{
        entities::SavedReport,
        requests::{CreateReportRequest, MonthlyParams, NewReport, ReportListParams},
    },
    system::entities::AuditAction,
};
use crate::services::{
    bad_request, error_response, not_found, record_audit, require_user_id, trim_optional,
};
use crate::utils::period::{date_range_bounds, month_name};

pub(super) fn default_title(year: i32, month: u32) -> String {
    format!("Laporan Bulanan {} {}", month_name(month), year)
}

pub async fn list_reports(
    service: &ReportService,
    params: ReportListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (page, size) = params.pagination.normalized();

    match storage
        .list_reports_with_pagination(page, size, trim_optional(params.report_type))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Daftar laporan berhasil diambil",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

/// 生成并保存月度统计快照
pub async fn create_report(
    service: &ReportService,
    req: CreateReportRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user_id = match require_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    let params = MonthlyParams {
        year: req.year,
        month: req.month,
    };
    let (first, last) = match check_month(params) {
        Ok(bounds) => bounds,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = service.get_storage(request);
    let offset = AppConfig::get().school_offset();

    let statistics = match collect_statistics(&storage, first, last, offset).await {
        Ok(stats) => stats,
        Err(e) => return Ok(error_response(e)),
    };
    let data = match serde_json::to_value(&statistics) {
        Ok(data) => data,
        Err(e) => return Ok(error_response(e.into())),
    };

    let (from, until) = date_range_bounds(first, last, offset);
    let report = NewReport {
        title: trim_optional(req.title).unwrap_or_else(|| default_title(req.year, req.month)),
        report_type: SavedReport::MONTHLY.to_string(),
        period_start: from,
        period_end: until - 1,
        data,
        generated_by: Some(user_id),
    };

    match storage.create_report(report).await {
        Ok(saved) => {
            info!("Report {} saved by user {}", saved.id, user_id);
            record_audit(
                &storage,
                request,
                AuditAction::Create,
                "report",
                saved.id,
                Some(serde_json::json!({ "title": saved.title })),
            )
            .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                saved,
                "Laporan berhasil disimpan",
            )))
        }
        Err(e) => Ok(error_response(e)),
    }
}

pub async fn get_report(
    service: &ReportService,
    report_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_report_by_id(report_id).await {
        Ok(Some(report)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            report,
            "Laporan berhasil diambil",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ReportNotFound, "Laporan tidak ditemukan")),
        Err(e) => Ok(error_response(e)),
    }
}

pub async fn delete_report(
    service: &ReportService,
    report_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_report(report_id).await {
        Ok(true) => {
            record_audit(&storage, request, AuditAction::Delete, "report", report_id, None).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Laporan berhasil dihapus")))
        }
        Ok(false) => Ok(not_found(ErrorCode::ReportNotFound, "Laporan tidak ditemukan")),
        Err(e) => Ok(error_response(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_title() {
        assert_eq!(default_title(2025, 3), "Laporan Bulanan Maret 2025");
        assert_eq!(default_title(2024, 12), "Laporan Bulanan Desember 2024");
    }
}
