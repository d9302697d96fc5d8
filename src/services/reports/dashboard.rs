use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Datelike, Utc};

use super::ReportService;
use super::statistics::{status_counts, violation_stats};
use crate::config::AppConfig;
use crate::errors::{Result, SidisiplinError};
use crate::models::{ApiResponse, reports::responses::DashboardResponse};
use crate::services::error_response;
use crate::utils::period::{date_range_bounds, month_bounds};

const TOP_VIOLATIONS: usize = 5;
const RECENT_CASES: u64 = 5;

async fn build_dashboard(
    service: &ReportService,
    request: &HttpRequest,
) -> Result<DashboardResponse> {
    let storage = service.get_storage(request);
    let offset = AppConfig::get().school_offset();
    let today = Utc::now().with_timezone(&offset).date_naive();

    let active_students = storage.count_active_students().await?;
    let by_status = storage.count_cases_by_status().await?;
    let total_cases = by_status.iter().map(|(_, count)| count).sum();

    // 本月按学校时区计算
    let (first, last) = month_bounds(today.year(), today.month())
        .map_err(SidisiplinError::date_parse)?;
    let (from, until) = date_range_bounds(first, last, offset);
    let month_facts = storage.list_case_facts(from, until).await?;

    let mut top_violations = violation_stats(&month_facts);
    top_violations.truncate(TOP_VIOLATIONS);

    let recent_cases = storage.list_recent_cases(RECENT_CASES).await?;

    Ok(DashboardResponse {
        active_students: active_students as i64,
        total_cases,
        cases_by_status: status_counts(&by_status),
        cases_this_month: month_facts.len() as i64,
        top_violations,
        recent_cases,
    })
}

pub async fn get_dashboard(
    service: &ReportService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match build_dashboard(service, request).await {
        Ok(dashboard) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            dashboard,
            "Dashboard berhasil diambil",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}
