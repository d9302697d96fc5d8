/// 可导入的表格文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Csv,
    Xlsx,
}

const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// 根据文件名与文件头判断导入格式
///
/// xlsx 必须以 ZIP 头开始；csv 不能是二进制内容（含 NUL 字节）。
/// 扩展名与内容不符时返回 `None`。
pub fn detect_spreadsheet_format(filename: &str, data: &[u8]) -> Option<SpreadsheetFormat> {
    if data.is_empty() {
        return None;
    }

    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())?;

    match extension.as_str() {
        "xlsx" if data.starts_with(&ZIP_MAGIC) => Some(SpreadsheetFormat::Xlsx),
        "csv" if !data.iter().take(1024).any(|b| *b == 0) => Some(SpreadsheetFormat::Csv),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xlsx_requires_zip_header() {
        let header = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        assert_eq!(
            detect_spreadsheet_format("siswa.XLSX", &header),
            Some(SpreadsheetFormat::Xlsx)
        );
        assert_eq!(detect_spreadsheet_format("siswa.xlsx", b"nis,nama"), None);
    }

    #[test]
    fn test_csv_rejects_binary() {
        assert_eq!(
            detect_spreadsheet_format("siswa.csv", b"nis,name\n1001,Budi"),
            Some(SpreadsheetFormat::Csv)
        );
        assert_eq!(detect_spreadsheet_format("siswa.csv", &[0x00, 0x01]), None);
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(detect_spreadsheet_format("siswa.pdf", b"%PDF-1.4"), None);
        assert_eq!(detect_spreadsheet_format("siswa", b"nis"), None);
        assert_eq!(detect_spreadsheet_format("siswa.csv", b""), None);
    }
}
