//! 按学校时区换算日期区间

use chrono::{Datelike, FixedOffset, NaiveDate, NaiveTime, TimeDelta};

/// 学校时区某天 00:00 对应的 Unix 秒
pub fn day_start(date: NaiveDate, offset: FixedOffset) -> i64 {
    let local_midnight = date.and_time(NaiveTime::MIN);
    (local_midnight - TimeDelta::seconds(i64::from(offset.local_minus_utc())))
        .and_utc()
        .timestamp()
}

/// 含首尾两天的日期区间，返回左闭右开的 Unix 秒
pub fn date_range_bounds(start: NaiveDate, end: NaiveDate, offset: FixedOffset) -> (i64, i64) {
    let until = end
        .succ_opt()
        .map(|next| day_start(next, offset))
        .unwrap_or(i64::MAX);
    (day_start(start, offset), until)
}

/// 某月的首日与末日
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), String> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| format!("Bulan tidak valid: {year}-{month:02}"))?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next_month
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| format!("Bulan tidak valid: {year}-{month:02}"))?;
    Ok((first, last))
}

/// ISO 周标签，如 `2025-W03`
pub fn iso_week_label(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// 印尼语月份名，month 取 1..=12
pub fn month_name(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES[(month - 1) as usize],
        _ => "",
    }
}

/// 如 `1 Maret 2025`
pub fn indonesian_date(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), month_name(date.month()), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wib() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).unwrap()
    }

    #[test]
    fn test_day_start_in_offset() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        // 2025-01-01 00:00 +07:00 = 2024-12-31 17:00 UTC
        assert_eq!(day_start(date, wib()), 1_735_664_400);
    }

    #[test]
    fn test_range_covers_whole_end_day() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let (from, until) = date_range_bounds(start, end, wib());
        assert_eq!(until - from, 31 * 86_400);
    }

    #[test]
    fn test_month_bounds() {
        let (first, last) = month_bounds(2024, 2).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (_, last) = month_bounds(2025, 12).unwrap();
        assert_eq!(last, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());

        assert!(month_bounds(2025, 13).is_err());
    }

    #[test]
    fn test_indonesian_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(indonesian_date(date), "1 Maret 2025");
        assert_eq!(month_name(12), "Desember");
        assert_eq!(month_name(0), "");
    }

    #[test]
    fn test_iso_week_label() {
        // 2024-12-30 属于 2025 年第 1 周
        let date = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        assert_eq!(iso_week_label(date), "2025-W01");
        let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        assert_eq!(iso_week_label(date), "2025-W11");
    }
}
