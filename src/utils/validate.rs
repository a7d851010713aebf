use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]?\d|2[0-3]):([0-5]\d)$").expect("Invalid time regex"));

/// 姓名最短长度（去除首尾空白后）
pub const MIN_NAME_LENGTH: usize = 2;

/// 拼接名与姓并去除首尾空白
pub fn compose_full_name(name: &str, surname: Option<&str>) -> String {
    format!("{} {}", name.trim(), surname.unwrap_or_default().trim())
        .trim()
        .to_string()
}

pub fn validate_full_name(full_name: &str) -> Result<(), &'static str> {
    if full_name.trim().chars().count() < MIN_NAME_LENGTH {
        return Err("Name must be at least 2 characters");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Err("Valid email is required");
    }
    Ok(())
}

/// 去除首尾空白，空字符串视为未填写
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// 解析 `HH:MM` 格式的时间
pub fn parse_hhmm(value: &str) -> Result<NaiveTime, String> {
    let caps = TIME_RE
        .captures(value.trim())
        .ok_or_else(|| format!("Invalid time '{value}', expected HH:MM"))?;
    let hours: u32 = caps[1].parse().map_err(|_| format!("Invalid hour in '{value}'"))?;
    let minutes: u32 = caps[2]
        .parse()
        .map_err(|_| format!("Invalid minute in '{value}'"))?;
    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(|| format!("Invalid time '{value}'"))
}

/// 解析 `YYYY-MM-DD` 格式的日期
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{value}', expected YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_full_name() {
        assert_eq!(compose_full_name(" Ada ", Some("Lovelace ")), "Ada Lovelace");
        assert_eq!(compose_full_name("Ada", None), "Ada");
        assert_eq!(compose_full_name("  ", Some("")), "");
    }

    #[test]
    fn test_full_name_length() {
        assert!(validate_full_name("Al").is_ok());
        assert!(validate_full_name(" A ").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("teacher@school.edu").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(
            parse_hhmm("08:30").unwrap(),
            NaiveTime::from_hms_opt(8, 30, 0).unwrap()
        );
        assert_eq!(
            parse_hhmm("9:05").unwrap(),
            NaiveTime::from_hms_opt(9, 5, 0).unwrap()
        );
        assert!(parse_hhmm("24:00").is_err());
        assert!(parse_hhmm("12:60").is_err());
        assert!(parse_hhmm("noon").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-03-14").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
        );
        assert!(parse_date("14/03/2025").is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(Some(" Math ")).as_deref(), Some("Math"));
        assert_eq!(non_blank(None), None);
    }
}
