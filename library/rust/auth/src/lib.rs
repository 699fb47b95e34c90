//! casting-auth: キャスティング API 用の Bearer トークン認可ライブラリ
//!
//! Authorization ヘッダーから Bearer トークンを取り出し、アイデンティティプロバイダーの
//! JWKS エンドポイントから取得した公開鍵で RS256 署名を検証する。
//! 検証済み Claims に要求権限が含まれるかを判定し、失敗時は (status, code, description)
//! を持つ `AuthError` を返す。
//!
//! # 使い方
//!
//! ```ignore
//! use casting_auth::{AuthGuard, AuthSettings, AuthSwitch, KeyResolver, TokenVerifier};
//! use std::sync::Arc;
//!
//! let settings: AuthSettings = serde_yaml::from_str(yaml)?;
//! let resolver = KeyResolver::from_settings(&settings)?;
//! let verifier = TokenVerifier::new(&settings, Arc::new(resolver))?;
//! let guard = AuthGuard::new(Arc::new(verifier), AuthSwitch::from_env());
//!
//! let claims = guard.authorize(Some("Bearer eyJ..."), Some("get:movie")).await?;
//! ```

pub mod claims;
pub mod config;
pub mod error;
pub mod extractor;
pub mod guard;
pub mod jwks;
pub mod middleware;
pub mod provider;
pub mod verifier;

pub use claims::{Claims, RawClaims};
pub use config::AuthSettings;
pub use error::{AuthError, ClaimsViolation, HeaderProblem};
pub use extractor::extract_bearer_token;
pub use guard::{AuthGuard, AuthSwitch, Protected};
pub use jwks::{HttpJwksFetcher, JwksFetchError, JwksFetcher, KeyResolver, SigningKey};
pub use middleware::{require_permission, AuthErrorResponse, Authenticated};
pub use verifier::TokenVerifier;
