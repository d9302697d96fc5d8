/// 案件编号：`VC-<年份>-<序号>`，序号至少三位
pub fn format_case_number(year: i32, seq: i64) -> String {
    format!("VC-{year}-{seq:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_case_number() {
        assert_eq!(format_case_number(2025, 1), "VC-2025-001");
        assert_eq!(format_case_number(2025, 42), "VC-2025-042");
        assert_eq!(format_case_number(2026, 1234), "VC-2026-1234");
    }
}
