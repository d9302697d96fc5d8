use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, FixedOffset, Utc};
use tracing::info;

use super::CaseService;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode, cases::requests::CreateCaseRequest, system::entities::AuditAction,
};
use crate::services::{
    bad_request, error_response_with, record_audit, require_user_id, trim_optional,
};

const MAX_EVIDENCE_URLS: usize = 10;

/// 证据链接：去空白、去空串，只接受 http(s)
pub(super) fn normalize_evidence(urls: Vec<String>) -> Result<Vec<String>, String> {
    let urls: Vec<String> = urls
        .into_iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .collect();

    if urls.len() > MAX_EVIDENCE_URLS {
        return Err(format!("Maksimal {MAX_EVIDENCE_URLS} tautan bukti"));
    }
    if let Some(bad) = urls
        .iter()
        .find(|u| !u.starts_with("http://") && !u.starts_with("https://"))
    {
        return Err(format!("Tautan bukti tidak valid: {bad}"));
    }
    Ok(urls)
}

/// 事发日期（按学校时区的日历日）不能晚于今天
pub(super) fn check_incident_date(
    incident: DateTime<Utc>,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<(), String> {
    if incident.with_timezone(&offset).date_naive() > now.with_timezone(&offset).date_naive() {
        return Err("Tanggal kejadian tidak boleh di masa depan".to_string());
    }
    Ok(())
}

pub async fn create_case(
    service: &CaseService,
    mut req: CreateCaseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let reporter_id = match require_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let offset = AppConfig::get().school_offset();
    req.description = trim_optional(req.description);
    req.evidence_urls = match normalize_evidence(req.evidence_urls) {
        Ok(urls) => urls,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };
    if let Err(msg) = check_incident_date(req.incident_date, Utc::now(), offset) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);

    match storage.create_case(req, reporter_id, offset).await {
        Ok(case) => {
            info!(
                "Case {} created for student {} by user {}",
                case.case_number, case.student_id, reporter_id
            );
            record_audit(
                &storage,
                request,
                AuditAction::Create,
                "violation_case",
                case.id,
                Some(serde_json::json!({
                    "case_number": case.case_number,
                    "student_id": case.student_id,
                    "violation_id": case.violation_id,
                })),
            )
            .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                case,
                "Kasus berhasil dicatat",
            )))
        }
        Err(e) => Ok(error_response_with(ErrorCode::ValidationFailed, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalize_evidence() {
        let urls = vec![
            " https://drive.example.sch.id/foto1.jpg ".to_string(),
            "".to_string(),
        ];
        assert_eq!(
            normalize_evidence(urls).unwrap(),
            vec!["https://drive.example.sch.id/foto1.jpg"]
        );
        assert!(normalize_evidence(vec!["ftp://x/y".to_string()]).is_err());
        assert!(normalize_evidence(vec!["https://a/b".to_string(); 11]).is_err());
    }

    #[test]
    fn test_incident_date_uses_school_calendar() {
        let wib = FixedOffset::east_opt(7 * 3600).unwrap();
        // 2025-05-01 20:00 UTC 已是 WIB 的 5 月 2 日
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 20, 0, 0).unwrap();
        let same_local_day = Utc.with_ymd_and_hms(2025, 5, 2, 10, 0, 0).unwrap();
        let tomorrow = Utc.with_ymd_and_hms(2025, 5, 2, 18, 0, 0).unwrap();

        assert!(check_incident_date(same_local_day, now, wib).is_ok());
        assert!(check_incident_date(tomorrow, now, wib).is_err());
    }
}
