//! トークン検証器: 署名・有効期限・audience・issuer を検証し、未構造化ペイロードを返す。

use std::collections::HashSet;
use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use tracing::debug;

use crate::claims::RawClaims;
use crate::config::{AuthSettings, UnsupportedAlgorithm};
use crate::error::{AuthError, ClaimsViolation};
use crate::jwks::KeyResolver;

/// TokenVerifier は KeyResolver から得た公開鍵でトークンを検証する。
pub struct TokenVerifier {
    resolver: Arc<KeyResolver>,
    validation: Validation,
}

impl TokenVerifier {
    /// 設定の issuer・audience・署名アルゴリズムで TokenVerifier を生成する。
    pub fn new(
        settings: &AuthSettings,
        resolver: Arc<KeyResolver>,
    ) -> Result<Self, UnsupportedAlgorithm> {
        let algorithms = settings.algorithms()?;
        Ok(Self::with_expectations(
            resolver,
            &settings.issuer(),
            &settings.audience,
            algorithms,
        ))
    }

    /// 期待値を直接指定して TokenVerifier を生成する。
    pub fn with_expectations(
        resolver: Arc<KeyResolver>,
        issuer: &str,
        audience: &str,
        algorithms: Vec<Algorithm>,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        if !algorithms.is_empty() {
            validation.algorithms = algorithms;
        }
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        // exp 欠落は Claims 構築時に 400 として扱う
        validation.required_spec_claims = HashSet::new();

        Self {
            resolver,
            validation,
        }
    }

    /// verify はトークンを検証し、検証済みペイロードを返す。
    ///
    /// 署名検証は埋め込まれた Claims（exp を含む）を信頼する前に行われる。
    pub async fn verify(&self, token: &str) -> Result<RawClaims, AuthError> {
        let header = decode_header(token).map_err(|e| {
            debug!(error = %e, "token header could not be decoded");
            AuthError::TokenUnparseable
        })?;

        let kid = header.kid.ok_or(AuthError::KeyIdMissing)?;
        let key = self.resolver.resolve(&kid).await?;

        let decoding_key = DecodingKey::from_rsa_components(&key.n, &key.e).map_err(|e| {
            debug!(error = %e, kid = %kid, "signing key material is not a valid RSA key");
            AuthError::TokenUnparseable
        })?;

        let data = decode::<Map<String, Value>>(token, &decoding_key, &self.validation)
            .map_err(classify)?;
        let payload = data.claims;

        if is_expired(&payload, chrono::Utc::now().timestamp()) {
            return Err(AuthError::TokenExpired);
        }

        // aud / iss が存在しない場合、jsonwebtoken は照合をスキップする
        if !payload.contains_key("aud") || !payload.contains_key("iss") {
            return Err(AuthError::InvalidClaims(
                ClaimsViolation::AudienceOrIssuerMismatch,
            ));
        }

        Ok(RawClaims::new(payload))
    }
}

/// 現在時刻が exp 以上なら期限切れ。
#[allow(clippy::cast_precision_loss)]
fn is_expired(payload: &Map<String, Value>, now: i64) -> bool {
    payload
        .get("exp")
        .and_then(Value::as_f64)
        .is_some_and(|exp| exp <= now as f64)
}

fn classify(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => {
            AuthError::InvalidClaims(ClaimsViolation::AudienceOrIssuerMismatch)
        }
        _ => {
            debug!(error = %err, "token rejected");
            AuthError::TokenUnparseable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_expiry_boundary() {
        let now = 1_700_000_000;
        assert!(is_expired(&payload(json!({"exp": now})), now));
        assert!(is_expired(&payload(json!({"exp": now - 1})), now));
        assert!(!is_expired(&payload(json!({"exp": now + 1})), now));
        assert!(!is_expired(&payload(json!({})), now));
    }

    #[test]
    fn test_classify_error_kinds() {
        assert_eq!(
            classify(ErrorKind::ExpiredSignature.into()),
            AuthError::TokenExpired
        );
        assert_eq!(
            classify(ErrorKind::InvalidAudience.into()),
            AuthError::InvalidClaims(ClaimsViolation::AudienceOrIssuerMismatch)
        );
        assert_eq!(
            classify(ErrorKind::InvalidIssuer.into()),
            AuthError::InvalidClaims(ClaimsViolation::AudienceOrIssuerMismatch)
        );
        assert_eq!(
            classify(ErrorKind::InvalidSignature.into()),
            AuthError::TokenUnparseable
        );
    }
}
