//! axum 用の認可ミドルウェア。

use axum::{
    body::Body,
    extract::{FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error};

use crate::claims::Claims;
use crate::error::{AuthError, HeaderProblem};
use crate::guard::AuthGuard;

/// ミドルウェアファクトリの戻り値型。
type AuthMiddlewareFuture = std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, AuthErrorResponse>> + Send>,
>;

/// Authenticated は認可済みリクエストの Claims。
/// 認可が無効化されている場合は `None` を持つ。
#[derive(Debug, Clone)]
pub struct Authenticated(pub Option<Claims>);

impl Authenticated {
    pub fn claims(&self) -> Option<&Claims> {
        self.0.as_ref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.0.as_ref().map(Claims::subject)
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AuthErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Authenticated>().cloned().ok_or_else(|| {
            error!(path = %parts.uri.path(), "Authenticated extracted on a route without require_permission");
            AuthErrorResponse::guard_not_installed()
        })
    }
}

/// require_permission は指定権限を必須とするミドルウェアファクトリ。
/// `axum::middleware::from_fn` に渡して使う。権限が None の場合はトークンの検証のみ行う。
/// 成功時は `Authenticated` をリクエストエクステンションに格納する。
pub fn require_permission(
    guard: AuthGuard,
    permission: Option<&'static str>,
) -> impl Fn(Request<Body>, Next) -> AuthMiddlewareFuture + Clone {
    move |mut req: Request<Body>, next: Next| {
        let guard = guard.clone();
        Box::pin(async move {
            // 無効化中はヘッダーの形式も検査しない
            let header = if guard.switch().is_disabled() {
                None
            } else {
                authorization_header(&req)?
            };

            let claims = guard
                .authorize(header.as_deref(), permission)
                .await
                .map_err(|e| {
                    debug!(
                        error = %e,
                        code = e.code(),
                        permission = permission.unwrap_or("-"),
                        "request rejected by authorization guard"
                    );
                    AuthErrorResponse::from(e)
                })?;

            req.extensions_mut().insert(Authenticated(claims));
            Ok(next.run(req).await)
        })
    }
}

/// Authorization ヘッダーを文字列として取り出す。可視 ASCII 以外は形式不正とする。
fn authorization_header(req: &Request<Body>) -> Result<Option<String>, AuthErrorResponse> {
    req.headers()
        .get(AUTHORIZATION)
        .map(|v| {
            v.to_str().map(str::to_string).map_err(|_| {
                AuthErrorResponse::from(AuthError::MalformedHeader(HeaderProblem::NotBearerToken))
            })
        })
        .transpose()
}

/// AuthErrorResponse は認可エラーの HTTP レスポンス。
#[derive(Debug)]
pub struct AuthErrorResponse {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

impl AuthErrorResponse {
    fn guard_not_installed() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal_error".into(),
            message: "Internal server error".into(),
        }
    }
}

impl From<AuthError> for AuthErrorResponse {
    fn from(err: AuthError) -> Self {
        Self {
            status: err.status(),
            code: err.code().into(),
            message: err.description().into(),
        }
    }
}

impl IntoResponse for AuthErrorResponse {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error_code": self.status.as_u16().to_string(),
            "code": self.code,
            "message": self.message,
        });

        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClaimsViolation;

    #[test]
    fn test_from_auth_error() {
        let resp = AuthErrorResponse::from(AuthError::InvalidClaims(
            ClaimsViolation::AudienceOrIssuerMismatch,
        ));
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
        assert_eq!(resp.code, "invalid_claims");
        assert_eq!(
            resp.message,
            "Incorrect claims. Please, check the audience and issuer."
        );
    }

    #[test]
    fn test_into_response_status() {
        let resp = AuthErrorResponse::from(AuthError::Forbidden).into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
