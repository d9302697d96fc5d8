use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::cases::entities::{CaseDetail, CaseStatus};
use crate::models::{ApiResponse, ErrorCode, students::responses::StudentCasesResponse};
use crate::services::{error_response, not_found};

/// 累计积分，已撤销的案件不计入
pub(crate) fn total_points(cases: &[CaseDetail]) -> i64 {
    cases
        .iter()
        .filter(|c| c.case.status != CaseStatus::Dibatalkan)
        .filter_map(|c| c.violation.as_ref())
        .map(|v| i64::from(v.points))
        .sum()
}

pub async fn list_student_cases(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let student = match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Siswa tidak ditemukan")),
        Err(e) => return Ok(error_response(e)),
    };

    match storage.list_cases_by_student(student_id).await {
        Ok(cases) => {
            let total_points = total_points(&cases);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                StudentCasesResponse {
                    student,
                    cases,
                    total_points,
                },
                "Riwayat pelanggaran siswa berhasil diambil",
            )))
        }
        Err(e) => Ok(error_response(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cases::entities::{CaseViolation, ViolationCase};
    use crate::models::violations::entities::ViolationLevel;

    fn detail(status: CaseStatus, points: i32) -> CaseDetail {
        let now = chrono::Utc::now();
        CaseDetail {
            case: ViolationCase {
                id: 1,
                case_number: "VC-2025-001".to_string(),
                student_id: 1,
                violation_id: 1,
                reported_by: None,
                incident_date: now,
                description: None,
                evidence_urls: vec![],
                status,
                created_at: now,
                updated_at: now,
            },
            student: None,
            violation: Some(CaseViolation {
                id: 1,
                code: "1.A".to_string(),
                name: "Terlambat".to_string(),
                points,
                category_id: 1,
                category_code: "PASAL_1".to_string(),
                category_name: "Kedisiplinan".to_string(),
                category_level: ViolationLevel::Ringan,
            }),
            reporter: None,
        }
    }

    #[test]
    fn test_total_points_skips_cancelled_cases() {
        let cases = vec![
            detail(CaseStatus::Selesai, 10),
            detail(CaseStatus::Proses, 5),
            detail(CaseStatus::Dibatalkan, 25),
        ];
        assert_eq!(total_points(&cases), 15);
        assert_eq!(total_points(&[]), 0);
    }
}
