use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("Invalid digits regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{8,15}$").expect("Invalid phone regex"));

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 长度 3..=32
    if username.len() < 3 || username.len() > 32 {
        return Err("Username harus terdiri dari 3 sampai 32 karakter");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username hanya boleh berisi huruf, angka, titik, garis bawah atau tanda hubung");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Format email tidak valid");
    }
    Ok(())
}

/// 密码策略：至少 8 位，含大写、小写与数字，且不是常见弱密码
pub fn validate_password(password: &str) -> Result<(), String> {
    let mut errors = Vec::new();

    if password.len() < 8 {
        errors.push("minimal 8 karakter");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("harus mengandung huruf besar");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("harus mengandung huruf kecil");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("harus mengandung angka");
    }

    let weak_passwords = ["password1", "qwerty123", "admin123", "abcd1234", "sekolah123"];
    if weak_passwords
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("terlalu umum");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(format!("Password {}", errors.join(", ")))
    }
}

/// NIS：4 到 20 位数字
pub fn validate_nis(nis: &str) -> Result<(), &'static str> {
    if nis.len() < 4 || nis.len() > 20 || !DIGITS_RE.is_match(nis) {
        return Err("NIS harus berupa 4 sampai 20 digit angka");
    }
    Ok(())
}

/// NISN：固定 10 位数字
pub fn validate_nisn(nisn: &str) -> Result<(), &'static str> {
    if nisn.len() != 10 || !DIGITS_RE.is_match(nisn) {
        return Err("NISN harus berupa 10 digit angka");
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if !PHONE_RE.is_match(phone) {
        return Err("Nomor telepon tidak valid");
    }
    Ok(())
}

/// 必填文本字段去空白后不能为空
pub fn require_text(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} wajib diisi"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username() {
        assert!(validate_username("guru.budi").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("guru budi").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("budi@sekolah.sch.id").is_ok());
        assert!(validate_email("budi@").is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("Rahasia123").is_ok());

        let err = validate_password("abc").unwrap_err();
        assert!(err.contains("minimal 8 karakter"));
        assert!(err.contains("huruf besar"));

        assert!(validate_password("Admin123").unwrap_err().contains("terlalu umum"));
    }

    #[test]
    fn test_nis_and_nisn() {
        assert!(validate_nis("12345").is_ok());
        assert!(validate_nis("12a45").is_err());
        assert!(validate_nis("123").is_err());
        assert!(validate_nisn("0012345678").is_ok());
        assert!(validate_nisn("12345").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("+6281234567890").is_ok());
        assert!(validate_phone("0812-3456").is_err());
    }

    #[test]
    fn test_require_text() {
        assert!(require_text("Budi", "Nama").is_ok());
        assert_eq!(require_text("  ", "Nama").unwrap_err(), "Nama wajib diisi");
    }
}
