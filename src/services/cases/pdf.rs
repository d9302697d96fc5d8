//! 案件详情 PDF

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, FixedOffset, Utc};
use tracing::error;

use super::CaseService;
use super::get::load_full_case;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{ErrorCode, cases::responses::CaseFullResponse};
use crate::services::system::DynamicConfig;
use crate::services::{error_response, not_found};
use crate::utils::pdf::{PdfWriter, SchoolHeader};
use crate::utils::period::indonesian_date;

fn local_date(value: DateTime<Utc>, offset: FixedOffset) -> String {
    indonesian_date(value.with_timezone(&offset).date_naive())
}

pub(crate) fn render_case_pdf(
    school: &SchoolHeader,
    case: &CaseFullResponse,
    offset: FixedOffset,
    printed_at: DateTime<Utc>,
) -> Result<Vec<u8>> {
    let detail = &case.detail;
    let mut pdf = PdfWriter::new(&format!("Kasus {}", detail.case.case_number))?;

    pdf.letterhead(school);
    pdf.title("LAPORAN KASUS PELANGGARAN");
    pdf.subtitle(&format!("Nomor: {}", detail.case.case_number));

    pdf.heading("Data Kasus");
    pdf.field("Tanggal kejadian", &local_date(detail.case.incident_date, offset));
    pdf.field("Status", detail.case.status.as_str());
    if let Some(reporter) = &detail.reporter {
        let name = reporter
            .display_name
            .as_deref()
            .unwrap_or(reporter.username.as_str());
        pdf.field("Dilaporkan oleh", name);
    }
    if let Some(description) = &detail.case.description {
        pdf.field("Kronologi", description);
    }
    for url in &detail.case.evidence_urls {
        pdf.item(url);
    }

    pdf.heading("Data Siswa");
    match &detail.student {
        Some(student) => {
            pdf.field("Nama", &student.name);
            pdf.field("NIS", &student.nis);
            pdf.field("Kelas", &student.class_name);
            pdf.field("Jenis kelamin", &student.gender.to_string());
        }
        None => pdf.paragraph("-"),
    }

    pdf.heading("Pelanggaran");
    match &detail.violation {
        Some(violation) => {
            pdf.field("Kode", &violation.code);
            pdf.field("Nama", &violation.name);
            pdf.field(
                "Kategori",
                &format!(
                    "{} - {} ({})",
                    violation.category_code, violation.category_name, violation.category_level
                ),
            );
            pdf.field("Poin", &violation.points.to_string());
        }
        None => pdf.paragraph("-"),
    }

    pdf.heading("Tindakan");
    if case.actions.is_empty() {
        pdf.paragraph("Belum ada tindakan.");
    }
    for action in &case.actions {
        let mut line = format!(
            "{}: {}{}",
            local_date(action.action_date, offset),
            action.sanction_type_name.as_deref().unwrap_or("-"),
            if action.is_completed { " (selesai)" } else { "" }
        );
        if let Some(description) = &action.description {
            line.push_str(&format!(" - {description}"));
        }
        if let Some(follow_up) = action.follow_up_date {
            line.push_str(&format!(", tindak lanjut {}", local_date(follow_up, offset)));
        }
        pdf.item(&line);
    }

    pdf.heading("Sanksi");
    if case.sanctions.is_empty() {
        pdf.paragraph("Belum ada sanksi.");
    }
    for sanction in &case.sanctions {
        let period = match sanction.end_date {
            Some(end) => format!(
                "{} s.d. {}",
                local_date(sanction.start_date, offset),
                local_date(end, offset)
            ),
            None => local_date(sanction.start_date, offset),
        };
        let mut line = format!(
            "{} ({period}){}",
            sanction.sanction_type_name.as_deref().unwrap_or("-"),
            if sanction.is_completed { ", selesai" } else { "" }
        );
        if let Some(notes) = &sanction.notes {
            line.push_str(&format!(" - {notes}"));
        }
        pdf.item(&line);
    }

    pdf.signature(school, &local_date(printed_at, offset));
    pdf.finish()
}

pub async fn export_case_pdf(
    service: &CaseService,
    case_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let case = match load_full_case(&storage, case_id).await {
        Ok(Some(case)) => case,
        Ok(None) => return Ok(not_found(ErrorCode::CaseNotFound, "Kasus tidak ditemukan")),
        Err(e) => return Ok(error_response(e)),
    };

    let school = DynamicConfig::school_header().await;
    let offset = AppConfig::get().school_offset();

    match render_case_pdf(&school, &case, offset, Utc::now()) {
        Ok(bytes) => Ok(HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}.pdf\"", case.detail.case.case_number),
            ))
            .body(bytes)),
        Err(e) => {
            error!("Case {} PDF generation failed: {}", case_id, e);
            Ok(error_response(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cases::entities::{CaseDetail, CaseStatus, ViolationCase};

    #[test]
    fn test_render_case_pdf_without_relations() {
        let now = Utc::now();
        let case = CaseFullResponse {
            detail: CaseDetail {
                case: ViolationCase {
                    id: 7,
                    case_number: "VC-2025-007".to_string(),
                    student_id: 1,
                    violation_id: 1,
                    reported_by: None,
                    incident_date: now,
                    description: Some("Membolos jam pelajaran ketiga".to_string()),
                    evidence_urls: vec![],
                    status: CaseStatus::Pending,
                    created_at: now,
                    updated_at: now,
                },
                student: None,
                violation: None,
                reporter: None,
            },
            actions: vec![],
            sanctions: vec![],
        };
        let school = SchoolHeader {
            school_name: "SMA Negeri 1 Contoh".to_string(),
            academic_year: "2025/2026".to_string(),
            ..Default::default()
        };
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();

        let bytes = render_case_pdf(&school, &case, offset, now).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
