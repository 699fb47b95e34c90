//! 検証済みトークンの Claims。
//!
//! 署名検証を通過しただけのペイロード `RawClaims` から、必須フィールドを確認して
//! `Claims` を構築する。`Claims` を得る経路は `TryFrom<RawClaims>` のみ。

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::error::{AuthError, ClaimsViolation};

const SUBJECT_KEY: &str = "sub";
const PERMISSIONS_KEY: &str = "permissions";
const EXPIRES_AT_KEY: &str = "exp";

/// RawClaims は署名・有効期限・aud/iss の検証を通過した未構造化ペイロード。
#[derive(Debug, Clone, PartialEq)]
pub struct RawClaims(Map<String, Value>);

impl RawClaims {
    pub(crate) fn new(payload: Map<String, Value>) -> Self {
        Self(payload)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Claims は subject・permissions・有効期限を必ず持つ検証済み Claims。
///
/// permissions 配列のうち文字列でない要素は捨てる。
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    subject: String,
    permissions: BTreeSet<String>,
    expires_at: DateTime<Utc>,
    raw: Map<String, Value>,
}

impl TryFrom<RawClaims> for Claims {
    type Error = AuthError;

    fn try_from(raw: RawClaims) -> Result<Self, Self::Error> {
        let payload = raw.into_inner();

        let subject = payload
            .get(SUBJECT_KEY)
            .and_then(Value::as_str)
            .ok_or(AuthError::InvalidClaims(ClaimsViolation::MissingSubject))?
            .to_string();

        let permissions = payload
            .get(PERMISSIONS_KEY)
            .and_then(Value::as_array)
            .ok_or(AuthError::InvalidClaims(ClaimsViolation::MissingPermissions))?
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();

        let expires_at = payload
            .get(EXPIRES_AT_KEY)
            .and_then(timestamp)
            .ok_or(AuthError::InvalidClaims(ClaimsViolation::MissingExpiry))?;

        Ok(Self {
            subject,
            permissions,
            expires_at,
            raw: payload,
        })
    }
}

/// 数値の exp を UTC 時刻に変換する。小数部は切り捨てる。
fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    #[allow(clippy::cast_possible_truncation)]
    let secs = value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.trunc() as i64))?;
    Utc.timestamp_opt(secs, 0).single()
}

impl Claims {
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// 元のペイロード全体。
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// check_permission は要求権限を満たすか判定する。
    /// 要求が無い（None または空文字）場合は常に成功する。
    pub fn check_permission(&self, required: Option<&str>) -> Result<(), AuthError> {
        match required {
            None => Ok(()),
            Some(p) if p.is_empty() => Ok(()),
            Some(p) if self.has_permission(p) => Ok(()),
            Some(_) => Err(AuthError::Forbidden),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawClaims {
        match value {
            Value::Object(map) => RawClaims::new(map),
            _ => panic!("expected object"),
        }
    }

    fn valid() -> Value {
        json!({
            "sub": "auth0|casting-director",
            "permissions": ["get:movie", "add:movie"],
            "exp": 1_900_000_000,
            "aud": "casting-api",
        })
    }

    #[test]
    fn test_build_claims() {
        let claims = Claims::try_from(raw(valid())).unwrap();
        assert_eq!(claims.subject(), "auth0|casting-director");
        assert_eq!(claims.permissions().len(), 2);
        assert_eq!(claims.expires_at().timestamp(), 1_900_000_000);
        assert_eq!(claims.raw()["aud"], "casting-api");
    }

    #[test]
    fn test_missing_subject() {
        let mut v = valid();
        v.as_object_mut().unwrap().remove("sub");
        let err = Claims::try_from(raw(v)).unwrap_err();
        assert_eq!(err, AuthError::InvalidClaims(ClaimsViolation::MissingSubject));
        assert_eq!(err.status(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_permissions_even_with_subject_and_expiry() {
        let mut v = valid();
        v.as_object_mut().unwrap().remove("permissions");
        assert_eq!(
            Claims::try_from(raw(v)).unwrap_err(),
            AuthError::InvalidClaims(ClaimsViolation::MissingPermissions)
        );
    }

    #[test]
    fn test_missing_expiry() {
        let mut v = valid();
        v.as_object_mut().unwrap().remove("exp");
        assert_eq!(
            Claims::try_from(raw(v)).unwrap_err(),
            AuthError::InvalidClaims(ClaimsViolation::MissingExpiry)
        );
    }

    #[test]
    fn test_fractional_expiry_is_truncated() {
        let mut v = valid();
        v["exp"] = json!(1_900_000_000.75);
        let claims = Claims::try_from(raw(v)).unwrap();
        assert_eq!(claims.expires_at().timestamp(), 1_900_000_000);
    }

    #[test]
    fn test_check_permission_none_always_succeeds() {
        let mut v = valid();
        v["permissions"] = json!([]);
        let claims = Claims::try_from(raw(v)).unwrap();
        assert!(claims.check_permission(None).is_ok());
        assert!(claims.check_permission(Some("")).is_ok());
    }

    #[test]
    fn test_non_string_permissions_are_dropped() {
        let mut v = valid();
        v["permissions"] = json!(["get:movie", 42, null, {"scope": "delete:movie"}]);
        let claims = Claims::try_from(raw(v)).unwrap();
        assert_eq!(claims.permissions().len(), 1);
        assert!(claims.check_permission(Some("get:movie")).is_ok());
        assert_eq!(
            claims.check_permission(Some("delete:movie")).unwrap_err(),
            AuthError::Forbidden
        );
    }

    #[test]
    fn test_check_permission_membership() {
        let claims = Claims::try_from(raw(valid())).unwrap();
        assert!(claims.check_permission(Some("get:movie")).is_ok());
        assert_eq!(
            claims.check_permission(Some("delete:movie")).unwrap_err(),
            AuthError::Forbidden
        );
    }
}
