//! 简单的 A4 文本排版
//!
//! 自上而下逐行写入，空间不足时自动换页。只使用内置 Helvetica 字体。

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use crate::errors::{Result, SidisiplinError};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 18.0;
const BODY_SIZE: f32 = 10.0;

// 1pt = 0.3528mm，行距取字号的 1.4 倍
fn line_height(font_size: f32) -> f32 {
    font_size * 0.3528 * 1.4
}

// Helvetica 平均字宽约为字号的一半
fn max_chars(font_size: f32, indent: f32) -> usize {
    let usable_pt = (PAGE_WIDTH - 2.0 * MARGIN - indent) / 0.3528;
    ((usable_pt / (font_size * 0.52)) as usize).max(10)
}

/// 按单词折行，超长单词强制截断
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word.to_string();
            while word.chars().count() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let head: String = word.chars().take(max_chars).collect();
                word = word.chars().skip(max_chars).collect();
                lines.push(head);
            }

            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

// 内置字体只支持 Latin-1
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) < 0x100 { c } else { '?' })
        .collect()
}

fn pdf_error(e: printpdf::Error) -> SidisiplinError {
    SidisiplinError::document(format!("PDF 生成失败: {e}"))
}

/// 文档抬头与落款所需的学校信息
#[derive(Debug, Clone, Default)]
pub struct SchoolHeader {
    pub school_name: String,
    pub school_address: Option<String>,
    pub academic_year: String,
    pub headmaster_name: Option<String>,
    pub headmaster_nip: Option<String>,
}

pub struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor_y: f32,
    page_count: usize,
}

impl PdfWriter {
    pub fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(sanitize(title), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor_y: PAGE_HEIGHT - MARGIN,
            page_count: 1,
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    fn ensure_space(&mut self, height: f32) {
        if self.cursor_y - height >= MARGIN {
            return;
        }
        self.page_count += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Layer {}", self.page_count),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor_y = PAGE_HEIGHT - MARGIN;
    }

    fn write_line(&mut self, text: &str, size: f32, bold: bool, indent: f32) {
        self.ensure_space(line_height(size));
        self.cursor_y -= line_height(size);
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(sanitize(text), size, Mm(MARGIN + indent), Mm(self.cursor_y), font);
    }

    fn write_wrapped(&mut self, text: &str, size: f32, bold: bool, indent: f32) {
        for line in wrap_text(text, max_chars(size, indent)) {
            self.write_line(&line, size, bold, indent);
        }
    }

    pub fn spacer(&mut self, height: f32) {
        if self.cursor_y - height < MARGIN {
            self.ensure_space(height);
        } else {
            self.cursor_y -= height;
        }
    }

    pub fn title(&mut self, text: &str) {
        self.write_wrapped(text, 15.0, true, 0.0);
    }

    pub fn subtitle(&mut self, text: &str) {
        self.write_wrapped(text, 11.0, false, 0.0);
    }

    pub fn heading(&mut self, text: &str) {
        self.spacer(3.0);
        self.write_wrapped(text, 12.0, true, 0.0);
        self.spacer(1.0);
    }

    pub fn paragraph(&mut self, text: &str) {
        self.write_wrapped(text, BODY_SIZE, false, 0.0);
    }

    /// `标签: 值` 形式的一行
    pub fn field(&mut self, label: &str, value: &str) {
        self.write_wrapped(&format!("{label}: {value}"), BODY_SIZE, false, 0.0);
    }

    /// 缩进的列表项
    pub fn item(&mut self, text: &str) {
        self.write_wrapped(&format!("- {text}"), BODY_SIZE, false, 4.0);
    }

    /// 学校名称、地址与学年
    pub fn letterhead(&mut self, school: &SchoolHeader) {
        self.write_wrapped(&school.school_name.to_uppercase(), 13.0, true, 0.0);
        if let Some(address) = &school.school_address {
            self.write_wrapped(address, 9.0, false, 0.0);
        }
        self.write_wrapped(
            &format!("Tahun Ajaran {}", school.academic_year),
            9.0,
            false,
            0.0,
        );
        self.spacer(5.0);
    }

    /// 校长签名栏，未配置校长时省略
    pub fn signature(&mut self, school: &SchoolHeader, place_date: &str) {
        let Some(name) = &school.headmaster_name else {
            return;
        };
        self.spacer(8.0);
        self.write_line(place_date, BODY_SIZE, false, 110.0);
        self.write_line("Kepala Sekolah,", BODY_SIZE, false, 110.0);
        self.spacer(16.0);
        self.write_line(name, BODY_SIZE, true, 110.0);
        if let Some(nip) = &school.headmaster_nip {
            self.write_line(&format!("NIP. {nip}"), BODY_SIZE, false, 110.0);
        }
    }

    pub fn finish(self) -> Result<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text() {
        assert_eq!(
            wrap_text("Siswa terlambat masuk kelas", 12),
            vec!["Siswa", "terlambat", "masuk kelas"]
        );
        assert_eq!(wrap_text("", 10), vec![""]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_sanitize_non_latin() {
        assert_eq!(sanitize("Kasus 違規"), "Kasus ??");
        assert_eq!(sanitize("café"), "café");
    }

    #[test]
    fn test_letterhead_and_signature() {
        let school = SchoolHeader {
            school_name: "SMA Negeri 1 Contoh".to_string(),
            school_address: Some("Jl. Pendidikan No. 1".to_string()),
            academic_year: "2025/2026".to_string(),
            headmaster_name: Some("Dra. Siti Aminah".to_string()),
            headmaster_nip: None,
        };
        let mut writer = PdfWriter::new("Uji").unwrap();
        writer.letterhead(&school);
        writer.paragraph("Isi dokumen");
        writer.signature(&school, "Contoh, 1 Maret 2025");
        assert_eq!(writer.page_count(), 1);
        assert!(writer.finish().unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_writer_breaks_pages() {
        let mut writer = PdfWriter::new("Uji").unwrap();
        writer.title("Laporan Bulanan");
        for i in 0..120 {
            writer.item(&format!("Baris {i}"));
        }
        assert!(writer.page_count() > 1);

        let bytes = writer.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
