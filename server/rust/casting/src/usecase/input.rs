//! リクエストボディ（JSON オブジェクト）のフィールド解釈。

use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::value_object::parse_date;
use crate::usecase::error::UseCaseError;

/// null でない値が指定されていればそれを返す。
fn present<'a>(input: &'a Value, key: &str) -> Option<&'a Value> {
    input.get(key).filter(|v| !v.is_null())
}

/// 空でない文字列を必須とする。
pub(crate) fn required_text(input: &Value, key: &str, message: &str) -> Result<String, UseCaseError> {
    present(input, key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| UseCaseError::validation(message))
}

/// 有効な日付を必須とする。
pub(crate) fn required_date(input: &Value, key: &str, message: &str) -> Result<NaiveDate, UseCaseError> {
    present(input, key)
        .and_then(parse_date)
        .ok_or_else(|| UseCaseError::validation(message))
}

/// 指定されていれば空でない文字列であること。未指定・null は None。
pub(crate) fn optional_text(
    input: &Value,
    key: &str,
    message: &str,
) -> Result<Option<String>, UseCaseError> {
    match present(input, key) {
        None => Ok(None),
        Some(_) => required_text(input, key, message).map(Some),
    }
}

/// 真と評価される値が指定されていれば有効な日付であること。
/// 空文字列・0・false などは未指定として扱う。
pub(crate) fn optional_date(
    input: &Value,
    key: &str,
    message: &str,
) -> Result<Option<NaiveDate>, UseCaseError> {
    match input.get(key) {
        Some(value) if is_truthy(value) => parse_date(value)
            .map(Some)
            .ok_or_else(|| UseCaseError::validation(message)),
        _ => Ok(None),
    }
}

/// OptionalField はキーの有無と null を区別したフィールド。
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum OptionalField<'a> {
    Absent,
    Null,
    Value(&'a Value),
}

pub(crate) fn optional_field<'a>(input: &'a Value, key: &str) -> OptionalField<'a> {
    match input.get(key) {
        None => OptionalField::Absent,
        Some(Value::Null) => OptionalField::Null,
        Some(value) => OptionalField::Value(value),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_text() {
        let input = json!({"title": "Alien", "empty": "", "number": 5});
        assert_eq!(required_text(&input, "title", "m").unwrap(), "Alien");
        assert!(required_text(&input, "empty", "m").is_err());
        assert!(required_text(&input, "number", "m").is_err());
        assert!(required_text(&input, "missing", "m").is_err());
    }

    #[test]
    fn test_optional_text() {
        let input = json!({"title": "Alien", "empty": "", "null": null});
        assert_eq!(optional_text(&input, "title", "m").unwrap(), Some("Alien".to_string()));
        assert_eq!(optional_text(&input, "null", "m").unwrap(), None);
        assert_eq!(optional_text(&input, "missing", "m").unwrap(), None);
        assert!(matches!(
            optional_text(&input, "empty", "No title provided!"),
            Err(UseCaseError::Validation(m)) if m == "No title provided!"
        ));
    }

    #[test]
    fn test_optional_date_skips_falsy_values() {
        let input = json!({"empty": "", "zero": 0, "bad": "tomorrow", "ok": "1979-05-25"});
        assert_eq!(optional_date(&input, "empty", "m").unwrap(), None);
        assert_eq!(optional_date(&input, "zero", "m").unwrap(), None);
        assert_eq!(optional_date(&input, "missing", "m").unwrap(), None);
        assert!(optional_date(&input, "bad", "m").is_err());
        assert_eq!(
            optional_date(&input, "ok", "m").unwrap(),
            NaiveDate::from_ymd_opt(1979, 5, 25)
        );
    }

    #[test]
    fn test_optional_field() {
        let input = json!({"a": null, "b": "x"});
        assert_eq!(optional_field(&input, "a"), OptionalField::Null);
        assert_eq!(optional_field(&input, "c"), OptionalField::Absent);
        assert_eq!(optional_field(&input, "b"), OptionalField::Value(&json!("x")));
    }
}
