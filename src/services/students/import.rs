//! 学生批量导入（CSV / XLSX）

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use calamine::{Reader, Xlsx};
use chrono::NaiveDate;
use futures_util::StreamExt;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use tracing::{info, warn};

use super::StudentService;
use super::create::{normalize_create, school_today};
use crate::config::AppConfig;
use crate::errors::SidisiplinError;
use crate::models::students::entities::Gender;
use crate::models::students::requests::CreateStudentRequest;
use crate::models::students::responses::{StudentImportError, StudentImportResponse};
use crate::models::system::entities::AuditAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response, record_audit};
use crate::utils::{SpreadsheetFormat, detect_spreadsheet_format};

/// 导入解析错误
#[derive(Debug)]
enum ImportParseError {
    MissingColumn(&'static str),
    ParseFailed(String),
    EmptyFile,
}

impl ImportParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingColumn(_) => ErrorCode::ImportFileMissingColumn,
            Self::ParseFailed(_) => ErrorCode::ImportFileParseFailed,
            Self::EmptyFile => ErrorCode::ImportFileDataInvalid,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::MissingColumn(col) => format!("Kolom wajib tidak ditemukan: {col}"),
            Self::ParseFailed(msg) => msg.clone(),
            Self::EmptyFile => "File tidak berisi data".to_string(),
        }
    }
}

/// 表头别名，第一个为标准名
const NIS: &[&str] = &["nis"];
const NISN: &[&str] = &["nisn"];
const NAME: &[&str] = &["name", "nama"];
const GENDER: &[&str] = &["gender", "jenis_kelamin", "jk"];
const CLASS_NAME: &[&str] = &["class_name", "kelas"];
const BIRTH_DATE: &[&str] = &["birth_date", "tanggal_lahir"];
const PARENT_NAME: &[&str] = &["parent_name", "nama_orang_tua"];
const PARENT_PHONE: &[&str] = &["parent_phone", "telepon_orang_tua"];
const ADDRESS: &[&str] = &["address", "alamat"];

/// 表头到列号的映射
#[derive(Debug)]
struct ImportColumns {
    nis: usize,
    name: usize,
    gender: usize,
    class_name: usize,
    nisn: Option<usize>,
    birth_date: Option<usize>,
    parent_name: Option<usize>,
    parent_phone: Option<usize>,
    address: Option<usize>,
}

impl ImportColumns {
    fn from_headers<I, S>(headers: I) -> Result<Self, ImportParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let header_map: HashMap<String, usize> = headers
            .into_iter()
            .enumerate()
            .map(|(i, h)| (h.as_ref().trim().to_lowercase().replace(' ', "_"), i))
            .collect();

        let find = |aliases: &[&str]| aliases.iter().find_map(|a| header_map.get(*a).copied());
        let require = |aliases: &'static [&'static str]| {
            find(aliases).ok_or(ImportParseError::MissingColumn(aliases[0]))
        };

        Ok(Self {
            nis: require(NIS)?,
            name: require(NAME)?,
            gender: require(GENDER)?,
            class_name: require(CLASS_NAME)?,
            nisn: find(NISN),
            birth_date: find(BIRTH_DATE),
            parent_name: find(PARENT_NAME),
            parent_phone: find(PARENT_PHONE),
            address: find(ADDRESS),
        })
    }

    fn read_row(&self, row_num: usize, cell: impl Fn(usize) -> String) -> ImportRow {
        let optional = |idx: Option<usize>| idx.map(&cell).filter(|s| !s.is_empty());
        ImportRow {
            row_num,
            nis: cell(self.nis),
            name: cell(self.name),
            gender: cell(self.gender),
            class_name: cell(self.class_name),
            nisn: optional(self.nisn),
            birth_date: optional(self.birth_date),
            parent_name: optional(self.parent_name),
            parent_phone: optional(self.parent_phone),
            address: optional(self.address),
        }
    }
}

/// 导入行原始数据
#[derive(Debug, Clone)]
struct ImportRow {
    row_num: usize,
    nis: String,
    name: String,
    gender: String,
    class_name: String,
    nisn: Option<String>,
    birth_date: Option<String>,
    parent_name: Option<String>,
    parent_phone: Option<String>,
    address: Option<String>,
}

fn parse_birth_date(value: &str) -> Result<NaiveDate, String> {
    ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .ok_or_else(|| format!("Tanggal lahir tidak valid: '{value}' (gunakan YYYY-MM-DD)"))
}

impl ImportRow {
    fn into_request(self, today: NaiveDate) -> Result<CreateStudentRequest, String> {
        let gender = self.gender.parse::<Gender>()?;
        let birth_date = self
            .birth_date
            .as_deref()
            .map(parse_birth_date)
            .transpose()?;

        normalize_create(
            CreateStudentRequest {
                nis: self.nis,
                nisn: self.nisn,
                name: self.name,
                gender,
                class_name: self.class_name,
                birth_date,
                parent_name: self.parent_name,
                parent_phone: self.parent_phone,
                address: self.address,
            },
            today,
        )
    }
}

async fn read_file_from_multipart(
    payload: &mut Multipart,
    max_bytes: usize,
) -> Result<(Vec<u8>, String), String> {
    let mut file_bytes = Vec::new();
    let mut file_name = String::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| format!("Gagal membaca form: {e}"))?;

        if field.name() != Some("file") {
            continue;
        }
        if let Some(content_disposition) = field.content_disposition() {
            file_name = content_disposition
                .get_filename()
                .unwrap_or_default()
                .to_string();
        }

        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| format!("Gagal membaca file: {e}"))?;
            if file_bytes.len() + data.len() > max_bytes {
                return Err("Ukuran file melebihi batas".to_string());
            }
            file_bytes.extend_from_slice(&data);
        }
    }

    if file_bytes.is_empty() {
        return Err("Field 'file' tidak ditemukan atau kosong".to_string());
    }

    Ok((file_bytes, file_name))
}

fn parse_csv(data: &[u8]) -> Result<Vec<ImportRow>, ImportParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(data));

    let headers = rdr
        .headers()
        .map_err(|e| ImportParseError::ParseFailed(format!("Gagal membaca header: {e}")))?;
    // 去掉 Excel 导出的 UTF-8 BOM
    let headers: Vec<String> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    let columns = ImportColumns::from_headers(&headers)?;

    let mut rows = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let row_num = index + 2;
        let record = result.map_err(|e| {
            ImportParseError::ParseFailed(format!("Baris {row_num} tidak dapat dibaca: {e}"))
        })?;
        if record.iter().all(|v| v.is_empty()) {
            continue;
        }
        rows.push(columns.read_row(row_num, |idx| {
            record.get(idx).unwrap_or("").trim().to_string()
        }));
    }

    Ok(rows)
}

fn parse_xlsx(data: &[u8]) -> Result<Vec<ImportRow>, ImportParseError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data))
        .map_err(|e| ImportParseError::ParseFailed(format!("Gagal membuka XLSX: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportParseError::ParseFailed("Workbook tidak memiliki sheet".into()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportParseError::ParseFailed(format!("Gagal membaca sheet: {e}")))?;

    let mut rows_iter = range.rows();
    let header_row = rows_iter.next().ok_or(ImportParseError::EmptyFile)?;
    let columns = ImportColumns::from_headers(header_row.iter().map(|c| c.to_string()))?;

    let mut rows = Vec::new();
    for (index, row) in rows_iter.enumerate() {
        let cell = |idx: usize| -> String {
            row.get(idx)
                .map(|c| c.to_string().trim().to_string())
                .unwrap_or_default()
        };
        if (0..row.len()).all(|idx| cell(idx).is_empty()) {
            continue;
        }
        rows.push(columns.read_row(index + 2, cell));
    }

    Ok(rows)
}

/// 逐行校验并写入；文件内或库中已存在的 NIS 计为跳过
async fn import_rows(
    storage: &std::sync::Arc<dyn crate::storage::Storage>,
    rows: Vec<ImportRow>,
    today: NaiveDate,
) -> Result<StudentImportResponse, SidisiplinError> {
    let mut response = StudentImportResponse {
        total: rows.len(),
        ..Default::default()
    };
    let mut seen_nis: HashSet<String> = HashSet::new();

    for row in rows {
        let row_num = row.row_num;
        let raw_nis = Some(row.nis.trim().to_string()).filter(|s| !s.is_empty());

        let student = match row.into_request(today) {
            Ok(student) => student,
            Err(message) => {
                response.failed += 1;
                response.errors.push(StudentImportError {
                    row: row_num,
                    nis: raw_nis,
                    message,
                });
                continue;
            }
        };

        if !seen_nis.insert(student.nis.clone()) {
            response.skipped += 1;
            response.errors.push(StudentImportError {
                row: row_num,
                nis: Some(student.nis),
                message: "NIS duplikat di dalam file".to_string(),
            });
            continue;
        }

        if storage.get_student_by_nis(&student.nis).await?.is_some() {
            response.skipped += 1;
            response.errors.push(StudentImportError {
                row: row_num,
                nis: Some(student.nis),
                message: "NIS sudah terdaftar".to_string(),
            });
            continue;
        }

        let nis = student.nis.clone();
        match storage.create_student(student).await {
            Ok(_) => response.imported += 1,
            Err(SidisiplinError::Validation(message)) => {
                response.skipped += 1;
                response.errors.push(StudentImportError {
                    row: row_num,
                    nis: Some(nis),
                    message,
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(response)
}

pub async fn import_students(
    service: &StudentService,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let limits = &AppConfig::get().server.limits;

    let (file_bytes, file_name) =
        match read_file_from_multipart(&mut payload, limits.max_payload_size).await {
            Ok(result) => result,
            Err(e) => return Ok(bad_request(ErrorCode::FileUploadFailed, e)),
        };

    let parsed = match detect_spreadsheet_format(&file_name, &file_bytes) {
        Some(SpreadsheetFormat::Xlsx) => parse_xlsx(&file_bytes),
        Some(SpreadsheetFormat::Csv) => parse_csv(&file_bytes),
        None => {
            return Ok(bad_request(
                ErrorCode::FileTypeNotAllowed,
                "Format file harus CSV atau XLSX",
            ));
        }
    };
    let rows = match parsed {
        Ok(rows) if rows.is_empty() => {
            return Ok(bad_request(
                ErrorCode::ImportFileDataInvalid,
                "File tidak berisi baris data",
            ));
        }
        Ok(rows) => rows,
        Err(e) => return Ok(bad_request(e.error_code(), e.message())),
    };

    if rows.len() > limits.max_import_rows {
        return Ok(bad_request(
            ErrorCode::ImportFileDataInvalid,
            format!(
                "Maksimal {} baris per impor, file berisi {} baris",
                limits.max_import_rows,
                rows.len()
            ),
        ));
    }

    let storage = service.get_storage(request);

    match import_rows(&storage, rows, school_today()).await {
        Ok(result) => {
            info!(
                "Student import finished: {} imported, {} skipped, {} failed",
                result.imported, result.skipped, result.failed
            );
            if result.imported > 0 {
                record_audit(
                    &storage,
                    request,
                    AuditAction::Create,
                    "student",
                    "import",
                    Some(serde_json::json!({
                        "file": file_name,
                        "imported": result.imported,
                        "skipped": result.skipped,
                        "failed": result.failed,
                    })),
                )
                .await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(result, "Impor siswa selesai")))
        }
        Err(e) => {
            warn!("Student import aborted: {}", e);
            Ok(error_response(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
    }

    #[test]
    fn test_csv_with_indonesian_headers() {
        let data = "\u{feff}NIS,Nama,JK,Kelas,Tanggal Lahir\n20231001,Andi,L,XI IPA 2,2008-05-17\n,,,,\n20231002,Sari,p,XI IPA 2,17/06/2008\n";
        let rows = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_num, 2);
        assert_eq!(rows[1].row_num, 4);
        assert_eq!(rows[1].birth_date.as_deref(), Some("17/06/2008"));

        let student = rows[1].clone().into_request(today()).unwrap();
        assert_eq!(student.gender, Gender::P);
        assert_eq!(student.birth_date, NaiveDate::from_ymd_opt(2008, 6, 17));
    }

    #[test]
    fn test_csv_missing_required_column() {
        let err = parse_csv(b"nis,name,gender\n1001,Andi,L\n").unwrap_err();
        assert!(matches!(err, ImportParseError::MissingColumn("class_name")));
        assert_eq!(err.error_code(), ErrorCode::ImportFileMissingColumn);
    }

    #[test]
    fn test_invalid_row_reports_reason() {
        let rows = parse_csv(b"nis,name,gender,class_name\n1001,Andi,X,X IPA 1\n").unwrap();
        let err = rows[0].clone().into_request(today()).unwrap_err();
        assert!(err.contains("Jenis kelamin"));
    }

    #[tokio::test]
    async fn test_import_skips_duplicates() {
        let storage: Arc<dyn crate::storage::Storage> =
            Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());

        let existing = rows_from(b"nis,name,gender,class_name\n1001,Andi,L,X IPA 1\n");
        let first = import_rows(&storage, existing, today()).await.unwrap();
        assert_eq!(first.imported, 1);

        let rows = rows_from(
            b"nis,name,gender,class_name\n1001,Andi,L,X IPA 1\n1002,Budi,L,X IPA 1\n1002,Budi,L,X IPA 1\n12,Cici,P,X IPA 1\n",
        );
        let result = import_rows(&storage, rows, today()).await.unwrap();
        assert_eq!(result.total, 4);
        assert_eq!(result.imported, 1);
        assert_eq!(result.skipped, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.errors.len(), 3);
        assert!(storage.get_student_by_nis("1002").await.unwrap().is_some());
    }

    fn rows_from(data: &[u8]) -> Vec<ImportRow> {
        parse_csv(data).unwrap()
    }
}
