//! 案件统计聚合
//!
//! 输入为区间内的案件扁平行，全部在内存中聚合。日期按学校时区分桶。

use chrono::{FixedOffset, NaiveDate};
use std::collections::HashMap;

use crate::models::cases::entities::CaseStatus;
use crate::models::reports::entities::{
    CaseFact, CategoryStat, ClassStat, PeriodCount, StatusCount, Statistics, StudentStat,
    ViolationStat,
};
use crate::utils::period::iso_week_label;

/// 四舍五入的百分比，分母为 0 时返回 0
pub fn percentage(count: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (count * 200 + total) / (total * 2)
}

/// 每种状态一行，数量为 0 的状态也保留
pub fn status_counts(counts: &[(CaseStatus, i64)]) -> Vec<StatusCount> {
    let total: i64 = counts.iter().map(|(_, c)| c).sum();
    CaseStatus::ALL
        .iter()
        .map(|status| {
            let count = counts
                .iter()
                .filter(|(s, _)| s == status)
                .map(|(_, c)| c)
                .sum();
            StatusCount {
                status: *status,
                count,
                percentage: percentage(count, total),
            }
        })
        .collect()
}

fn period_counts(labels: impl Iterator<Item = String>) -> Vec<PeriodCount> {
    let mut counts: HashMap<String, i64> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut result: Vec<PeriodCount> = counts
        .into_iter()
        .map(|(period, count)| PeriodCount { period, count })
        .collect();
    result.sort_by(|a, b| a.period.cmp(&b.period));
    result
}

pub fn violation_stats(facts: &[CaseFact]) -> Vec<ViolationStat> {
    let total = facts.len() as i64;
    let mut map: HashMap<i64, ViolationStat> = HashMap::new();
    for fact in facts {
        map.entry(fact.violation_id)
            .or_insert_with(|| ViolationStat {
                violation_id: fact.violation_id,
                code: fact.violation_code.clone(),
                name: fact.violation_name.clone(),
                count: 0,
                percentage: 0,
            })
            .count += 1;
    }
    let mut stats: Vec<ViolationStat> = map.into_values().collect();
    for stat in &mut stats {
        stat.percentage = percentage(stat.count, total);
    }
    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.code.cmp(&b.code)));
    stats
}

fn category_stats(facts: &[CaseFact]) -> Vec<CategoryStat> {
    let total = facts.len() as i64;
    let mut map: HashMap<i64, CategoryStat> = HashMap::new();
    for fact in facts {
        map.entry(fact.category_id)
            .or_insert_with(|| CategoryStat {
                category_id: fact.category_id,
                code: fact.category_code.clone(),
                name: fact.category_name.clone(),
                level: fact.category_level,
                count: 0,
                percentage: 0,
            })
            .count += 1;
    }
    let mut stats: Vec<CategoryStat> = map.into_values().collect();
    for stat in &mut stats {
        stat.percentage = percentage(stat.count, total);
    }
    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.code.cmp(&b.code)));
    stats
}

fn class_stats(facts: &[CaseFact]) -> Vec<ClassStat> {
    let total = facts.len() as i64;
    let mut map: HashMap<&str, i64> = HashMap::new();
    for fact in facts {
        *map.entry(fact.class_name.as_str()).or_default() += 1;
    }
    let mut stats: Vec<ClassStat> = map
        .into_iter()
        .map(|(class_name, count)| ClassStat {
            class_name: class_name.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect();
    stats.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.class_name.cmp(&b.class_name))
    });
    stats
}

/// 违规最多的学生；已撤销的案件不计入
fn top_students(facts: &[CaseFact], limit: usize) -> Vec<StudentStat> {
    let mut map: HashMap<i64, StudentStat> = HashMap::new();
    for fact in facts.iter().filter(|f| f.status != CaseStatus::Dibatalkan) {
        let entry = map.entry(fact.student_id).or_insert_with(|| StudentStat {
            student_id: fact.student_id,
            nis: fact.student_nis.clone(),
            name: fact.student_name.clone(),
            class_name: fact.class_name.clone(),
            case_count: 0,
            total_points: 0,
        });
        entry.case_count += 1;
        entry.total_points += i64::from(fact.points);
    }
    let mut stats: Vec<StudentStat> = map.into_values().collect();
    stats.sort_by(|a, b| {
        b.case_count
            .cmp(&a.case_count)
            .then_with(|| b.total_points.cmp(&a.total_points))
            .then_with(|| a.name.cmp(&b.name))
    });
    stats.truncate(limit);
    stats
}

pub fn build_statistics(
    facts: &[CaseFact],
    start: NaiveDate,
    end: NaiveDate,
    offset: FixedOffset,
    top_limit: usize,
) -> Statistics {
    let local_dates: Vec<NaiveDate> = facts
        .iter()
        .map(|f| f.incident_date.with_timezone(&offset).date_naive())
        .collect();

    let mut status_totals: HashMap<CaseStatus, i64> = HashMap::new();
    for fact in facts {
        *status_totals.entry(fact.status).or_default() += 1;
    }
    let status_totals: Vec<(CaseStatus, i64)> = status_totals.into_iter().collect();

    Statistics {
        start,
        end,
        total_cases: facts.len() as i64,
        by_status: status_counts(&status_totals),
        by_day: period_counts(
            local_dates
                .iter()
                .map(|d| d.format("%Y-%m-%d").to_string()),
        ),
        by_week: period_counts(local_dates.iter().map(|d| iso_week_label(*d))),
        by_violation: violation_stats(facts),
        by_category: category_stats(facts),
        by_class: class_stats(facts),
        top_students: top_students(facts, top_limit),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::violations::entities::ViolationLevel;
    use chrono::{TimeZone, Utc};

    pub(crate) fn fact(
        case_id: i64,
        student_id: i64,
        violation_id: i64,
        status: CaseStatus,
        incident: chrono::DateTime<Utc>,
    ) -> CaseFact {
        CaseFact {
            case_id,
            status,
            incident_date: incident,
            student_id,
            student_nis: format!("2023{student_id:04}"),
            student_name: format!("Siswa {student_id}"),
            class_name: if student_id % 2 == 0 {
                "XI IPA 1".to_string()
            } else {
                "XI IPS 2".to_string()
            },
            violation_id,
            violation_code: format!("1.{violation_id}"),
            violation_name: format!("Pelanggaran {violation_id}"),
            points: 10 * violation_id as i32,
            category_id: 1,
            category_code: "PASAL_1".to_string(),
            category_name: "Kedisiplinan".to_string(),
            category_level: ViolationLevel::Ringan,
        }
    }

    fn wib() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).unwrap()
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(1, 200), 1);
        assert_eq!(percentage(0, 5), 0);
        assert_eq!(percentage(3, 0), 0);
    }

    #[test]
    fn test_status_counts_include_zero_rows() {
        let counts = status_counts(&[(CaseStatus::Pending, 3), (CaseStatus::Selesai, 1)]);
        assert_eq!(counts.len(), 4);
        assert_eq!(counts[0].status, CaseStatus::Pending);
        assert_eq!(counts[0].percentage, 75);
        assert_eq!(counts[1].count, 0);
        assert_eq!(counts[1].percentage, 0);
    }

    #[test]
    fn test_days_bucketed_in_school_offset() {
        // 2025-03-31 18:00 UTC 在 WIB 已是 4 月 1 日
        let late = Utc.with_ymd_and_hms(2025, 3, 31, 18, 0, 0).unwrap();
        let morning = Utc.with_ymd_and_hms(2025, 4, 1, 2, 0, 0).unwrap();
        let facts = vec![
            fact(1, 1, 1, CaseStatus::Pending, late),
            fact(2, 2, 1, CaseStatus::Proses, morning),
        ];
        let start = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let stats = build_statistics(&facts, start, start, wib(), 10);

        assert_eq!(
            stats.by_day,
            vec![PeriodCount {
                period: "2025-04-01".to_string(),
                count: 2
            }]
        );
        assert_eq!(stats.by_week[0].period, "2025-W14");
    }

    #[test]
    fn test_breakdowns_and_top_students() {
        let day = Utc.with_ymd_and_hms(2025, 5, 5, 3, 0, 0).unwrap();
        let facts = vec![
            fact(1, 1, 1, CaseStatus::Selesai, day),
            fact(2, 1, 2, CaseStatus::Proses, day),
            fact(3, 2, 1, CaseStatus::Pending, day),
            fact(4, 3, 2, CaseStatus::Dibatalkan, day),
        ];
        let start = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 5, 31).unwrap();
        let stats = build_statistics(&facts, start, end, wib(), 2);

        assert_eq!(stats.total_cases, 4);
        assert_eq!(stats.by_violation.len(), 2);
        assert_eq!(stats.by_violation[0].code, "1.1");
        assert_eq!(stats.by_violation[0].percentage, 50);
        assert_eq!(stats.by_category[0].count, 4);
        assert_eq!(stats.by_category[0].percentage, 100);

        let ips = stats
            .by_class
            .iter()
            .find(|c| c.class_name == "XI IPS 2")
            .unwrap();
        assert_eq!(ips.count, 3);
        assert_eq!(ips.percentage, 75);

        assert_eq!(stats.top_students.len(), 2);
        assert_eq!(stats.top_students[0].student_id, 1);
        assert_eq!(stats.top_students[0].case_count, 2);
        assert_eq!(stats.top_students[0].total_points, 30);
        assert!(stats.top_students.iter().all(|s| s.student_id != 3));
    }

    #[test]
    fn test_empty_period() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let stats = build_statistics(&[], start, start, wib(), 10);
        assert_eq!(stats.total_cases, 0);
        assert!(stats.by_status.iter().all(|s| s.percentage == 0));
        assert!(stats.top_students.is_empty());
    }
}
