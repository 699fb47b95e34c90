//! 認可失敗の分類。
//!
//! 各失敗は検出箇所で生成され、そのまま境界（HTTP ハンドラ）まで伝播する。
//! 境界では `status()` / `code()` / `description()` を使って構造化レスポンスに変換する。

use http::StatusCode;

/// HeaderProblem は Authorization ヘッダーの形式不正の内訳。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderProblem {
    /// スキームが Bearer ではない。
    WrongScheme,
    /// スキームのみでトークンがない。
    TokenMissing,
    /// 空白区切りで 3 要素以上ある、または ASCII として読めない。
    NotBearerToken,
}

/// ClaimsViolation は Claims 検証失敗の内訳。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimsViolation {
    /// aud / iss が期待値と一致しない。
    AudienceOrIssuerMismatch,
    MissingSubject,
    MissingPermissions,
    MissingExpiry,
}

/// AuthError は認可処理の失敗を表す。
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing Authorization header")]
    HeaderMissing,

    #[error("malformed Authorization header: {0:?}")]
    MalformedHeader(HeaderProblem),

    #[error("token header has no key id")]
    KeyIdMissing,

    #[error("no signing key matches the token key id")]
    KeyNotFound,

    #[error("token could not be parsed or its signature is invalid")]
    TokenUnparseable,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid claims: {0:?}")]
    InvalidClaims(ClaimsViolation),

    #[error("permission not found")]
    Forbidden,
}

impl AuthError {
    /// 境界で返す HTTP ステータス。
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::HeaderMissing
            | AuthError::MalformedHeader(_)
            | AuthError::KeyIdMissing
            | AuthError::TokenExpired
            | AuthError::InvalidClaims(ClaimsViolation::AudienceOrIssuerMismatch) => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::KeyNotFound
            | AuthError::TokenUnparseable
            | AuthError::InvalidClaims(_) => StatusCode::BAD_REQUEST,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    /// 機械可読なエラーコード。
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::HeaderMissing => "authorization_header_missing",
            AuthError::MalformedHeader(_)
            | AuthError::KeyIdMissing
            | AuthError::KeyNotFound
            | AuthError::TokenUnparseable => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims(_) => "invalid_claims",
            AuthError::Forbidden => "unauthorized",
        }
    }

    /// 利用者向けの説明文。
    pub fn description(&self) -> &'static str {
        match self {
            AuthError::HeaderMissing => "Authorization header is expected.",
            AuthError::MalformedHeader(HeaderProblem::WrongScheme) => {
                "Authorization header must start with 'Bearer'."
            }
            AuthError::MalformedHeader(HeaderProblem::TokenMissing) => "Token not found.",
            AuthError::MalformedHeader(HeaderProblem::NotBearerToken) => {
                "Authorization header must be bearer token."
            }
            AuthError::KeyIdMissing => "Authorization malformed.",
            AuthError::KeyNotFound => "Unable to find the appropriate key.",
            AuthError::TokenUnparseable => "Unable to parse authentication token.",
            AuthError::TokenExpired => "Token expired.",
            AuthError::InvalidClaims(ClaimsViolation::AudienceOrIssuerMismatch) => {
                "Incorrect claims. Please, check the audience and issuer."
            }
            AuthError::InvalidClaims(ClaimsViolation::MissingSubject) => {
                "Subject not included in JWT."
            }
            AuthError::InvalidClaims(ClaimsViolation::MissingPermissions) => {
                "Permissions not included in JWT."
            }
            AuthError::InvalidClaims(ClaimsViolation::MissingExpiry) => {
                "Expires at timestamp missing in JWT."
            }
            AuthError::Forbidden => "Permission not found.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_per_kind() {
        assert_eq!(AuthError::HeaderMissing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::MalformedHeader(HeaderProblem::WrongScheme).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::KeyIdMissing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::KeyNotFound.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::TokenUnparseable.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::TokenExpired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::Forbidden.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_invalid_claims_status_depends_on_violation() {
        assert_eq!(
            AuthError::InvalidClaims(ClaimsViolation::AudienceOrIssuerMismatch).status(),
            StatusCode::UNAUTHORIZED
        );
        for violation in [
            ClaimsViolation::MissingSubject,
            ClaimsViolation::MissingPermissions,
            ClaimsViolation::MissingExpiry,
        ] {
            assert_eq!(
                AuthError::InvalidClaims(violation).status(),
                StatusCode::BAD_REQUEST
            );
        }
    }

    #[test]
    fn test_codes_and_descriptions() {
        assert_eq!(AuthError::HeaderMissing.code(), "authorization_header_missing");
        assert_eq!(AuthError::KeyNotFound.code(), "invalid_header");
        assert_eq!(AuthError::Forbidden.code(), "unauthorized");
        assert_eq!(
            AuthError::MalformedHeader(HeaderProblem::TokenMissing).description(),
            "Token not found."
        );
        assert_eq!(
            AuthError::InvalidClaims(ClaimsViolation::MissingPermissions).description(),
            "Permissions not included in JWT."
        );
    }
}
