//! 日付文字列（YYYY-MM-DD）の変換。

use chrono::NaiveDate;
use serde_json::Value;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// parse_date は JSON 値を日付に変換する。文字列以外・不正な日付は None。
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(&json!("1982-06-25")),
            NaiveDate::from_ymd_opt(1982, 6, 25)
        );
    }

    #[test]
    fn test_parse_date_rejects_invalid() {
        assert_eq!(parse_date(&json!("1982-02-30")), None);
        assert_eq!(parse_date(&json!("25.06.1982")), None);
        assert_eq!(parse_date(&json!(19_820_625)), None);
        assert_eq!(parse_date(&Value::Null), None);
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2019, 1, 5).unwrap();
        assert_eq!(format_date(date), "2019-01-05");
    }
}
