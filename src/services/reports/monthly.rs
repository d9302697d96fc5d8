//! 区间统计与月度报表

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::sync::Arc;
use tracing::error;

use super::ReportService;
use super::statistics::build_statistics;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    reports::{
        entities::Statistics,
        requests::{MonthlyParams, StatisticsParams},
        responses::MonthlyReport,
    },
};
use crate::services::system::DynamicConfig;
use crate::services::{bad_request, error_response};
use crate::storage::Storage;
use crate::utils::pdf::{PdfWriter, SchoolHeader};
use crate::utils::period::{date_range_bounds, indonesian_date, month_bounds, month_name};

const MAX_RANGE_DAYS: i64 = 366;

pub(super) fn check_range(start: NaiveDate, end: NaiveDate) -> std::result::Result<(), String> {
    if start > end {
        return Err("Tanggal awal harus sebelum tanggal akhir".to_string());
    }
    if (end - start).num_days() >= MAX_RANGE_DAYS {
        return Err(format!("Rentang maksimal {MAX_RANGE_DAYS} hari"));
    }
    Ok(())
}

pub(super) fn check_month(
    params: MonthlyParams,
) -> std::result::Result<(NaiveDate, NaiveDate), String> {
    if !(2000..=2100).contains(&params.year) {
        return Err("Tahun tidak valid".to_string());
    }
    month_bounds(params.year, params.month)
}

/// 区间统计；学生排行数量取动态配置
pub(super) async fn collect_statistics(
    storage: &Arc<dyn Storage>,
    start: NaiveDate,
    end: NaiveDate,
    offset: FixedOffset,
) -> Result<Statistics> {
    let (from, until) = date_range_bounds(start, end, offset);
    let facts = storage.list_case_facts(from, until).await?;
    let top_limit = DynamicConfig::top_students_limit().await as usize;
    Ok(build_statistics(&facts, start, end, offset, top_limit))
}

pub(super) async fn collect_monthly(
    storage: &Arc<dyn Storage>,
    params: MonthlyParams,
    first: NaiveDate,
    last: NaiveDate,
    offset: FixedOffset,
) -> Result<MonthlyReport> {
    let statistics = collect_statistics(storage, first, last, offset).await?;
    let (from, until) = date_range_bounds(first, last, offset);
    let cases = storage.list_cases_between(from, until).await?;

    Ok(MonthlyReport {
        year: params.year,
        month: params.month,
        statistics,
        cases,
    })
}

pub async fn get_statistics(
    service: &ReportService,
    params: StatisticsParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = check_range(params.start, params.end) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);
    let offset = AppConfig::get().school_offset();

    match collect_statistics(&storage, params.start, params.end, offset).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Statistik berhasil diambil",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

pub async fn get_monthly_report(
    service: &ReportService,
    params: MonthlyParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (first, last) = match check_month(params) {
        Ok(bounds) => bounds,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = service.get_storage(request);
    let offset = AppConfig::get().school_offset();

    match collect_monthly(&storage, params, first, last, offset).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            report,
            "Laporan bulanan berhasil diambil",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

pub(crate) fn render_monthly_pdf(
    school: &SchoolHeader,
    report: &MonthlyReport,
    offset: FixedOffset,
    printed_at: DateTime<Utc>,
) -> Result<Vec<u8>> {
    let period = format!("{} {}", month_name(report.month), report.year);
    let stats = &report.statistics;
    let mut pdf = PdfWriter::new(&format!("Laporan Bulanan {period}"))?;

    pdf.letterhead(school);
    pdf.title("LAPORAN BULANAN PELANGGARAN SISWA");
    pdf.subtitle(&format!("Periode: {period}"));

    pdf.heading("Ringkasan");
    pdf.field("Jumlah kasus", &stats.total_cases.to_string());
    for status in &stats.by_status {
        pdf.item(&format!(
            "{}: {} ({}%)",
            status.status, status.count, status.percentage
        ));
    }

    pdf.heading("Per Kategori");
    if stats.by_category.is_empty() {
        pdf.paragraph("-");
    }
    for category in &stats.by_category {
        pdf.item(&format!(
            "{} {} [{}]: {} ({}%)",
            category.code, category.name, category.level, category.count, category.percentage
        ));
    }

    pdf.heading("Per Pelanggaran");
    if stats.by_violation.is_empty() {
        pdf.paragraph("-");
    }
    for violation in &stats.by_violation {
        pdf.item(&format!(
            "{} {}: {} ({}%)",
            violation.code, violation.name, violation.count, violation.percentage
        ));
    }

    pdf.heading("Per Kelas");
    if stats.by_class.is_empty() {
        pdf.paragraph("-");
    }
    for class in &stats.by_class {
        pdf.item(&format!(
            "{}: {} ({}%)",
            class.class_name, class.count, class.percentage
        ));
    }

    pdf.heading("Siswa dengan Pelanggaran Terbanyak");
    if stats.top_students.is_empty() {
        pdf.paragraph("-");
    }
    for (rank, student) in stats.top_students.iter().enumerate() {
        pdf.item(&format!(
            "{}. {} ({}, {}): {} kasus, {} poin",
            rank + 1,
            student.name,
            student.nis,
            student.class_name,
            student.case_count,
            student.total_points
        ));
    }

    pdf.heading("Daftar Kasus");
    if report.cases.is_empty() {
        pdf.paragraph("Tidak ada kasus pada periode ini.");
    }
    for detail in &report.cases {
        let date = indonesian_date(detail.case.incident_date.with_timezone(&offset).date_naive());
        let student = detail
            .student
            .as_ref()
            .map(|s| format!("{} ({})", s.name, s.class_name))
            .unwrap_or_else(|| "-".to_string());
        let violation = detail
            .violation
            .as_ref()
            .map(|v| format!("{} {}", v.code, v.name))
            .unwrap_or_else(|| "-".to_string());
        pdf.item(&format!(
            "{} | {date} | {student} | {violation} | {}",
            detail.case.case_number, detail.case.status
        ));
    }

    let printed = indonesian_date(printed_at.with_timezone(&offset).date_naive());
    pdf.signature(school, &printed);
    pdf.finish()
}

pub async fn export_monthly_pdf(
    service: &ReportService,
    params: MonthlyParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (first, last) = match check_month(params) {
        Ok(bounds) => bounds,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = service.get_storage(request);
    let offset = AppConfig::get().school_offset();

    let report = match collect_monthly(&storage, params, first, last, offset).await {
        Ok(report) => report,
        Err(e) => return Ok(error_response(e)),
    };
    let school = DynamicConfig::school_header().await;

    match render_monthly_pdf(&school, &report, offset, Utc::now()) {
        Ok(bytes) => Ok(HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header((
                "Content-Disposition",
                format!(
                    "attachment; filename=\"laporan-{}-{:02}.pdf\"",
                    params.year, params.month
                ),
            ))
            .body(bytes)),
        Err(e) => {
            error!("Monthly report PDF generation failed: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ReportGenerationFailed,
                "Gagal membuat laporan PDF",
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cases::entities::CaseStatus;
    use crate::services::reports::statistics::tests::fact;
    use chrono::TimeZone;

    #[test]
    fn test_check_range() {
        let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();
        assert!(check_range(d(1, 1), d(1, 31)).is_ok());
        assert!(check_range(d(2, 1), d(1, 1)).is_err());
        assert!(check_range(d(1, 1), d(1, 1)).is_ok());
        let far = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        assert!(check_range(d(1, 1), far).is_err());
    }

    #[test]
    fn test_check_month() {
        let ok = check_month(MonthlyParams {
            year: 2025,
            month: 2,
        })
        .unwrap();
        assert_eq!(ok.1, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        assert!(check_month(MonthlyParams { year: 2025, month: 0 }).is_err());
        assert!(check_month(MonthlyParams { year: 1999, month: 5 }).is_err());
    }

    #[test]
    fn test_render_monthly_pdf() {
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let day = Utc.with_ymd_and_hms(2025, 3, 10, 2, 0, 0).unwrap();
        let facts = vec![
            fact(1, 1, 1, CaseStatus::Pending, day),
            fact(2, 2, 2, CaseStatus::Selesai, day),
        ];
        let first = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let report = MonthlyReport {
            year: 2025,
            month: 3,
            statistics: build_statistics(&facts, first, last, offset, 10),
            cases: vec![],
        };
        let school = SchoolHeader {
            school_name: "SMP Negeri 2 Contoh".to_string(),
            academic_year: "2024/2025".to_string(),
            headmaster_name: Some("Budi Santoso, S.Pd.".to_string()),
            ..Default::default()
        };

        let bytes = render_monthly_pdf(&school, &report, offset, day).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
