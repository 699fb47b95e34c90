//! Authorization ヘッダーから Bearer トークンを取り出す。暗号処理は行わない。

use crate::error::{AuthError, HeaderProblem};

/// extract_bearer_token は `Bearer <token>` 形式のヘッダー値からトークン部分を返す。
///
/// スキームは大文字小文字を区別しない。空白の連続は 1 つの区切りとして扱う。
/// ヘッダーが無い（または空白のみ）場合は `HeaderMissing`、形式不正は `MalformedHeader`。
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header
        .filter(|h| !h.trim().is_empty())
        .ok_or(AuthError::HeaderMissing)?;

    let mut parts = header.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::HeaderMissing)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader(HeaderProblem::WrongScheme));
    }

    let token = parts
        .next()
        .ok_or(AuthError::MalformedHeader(HeaderProblem::TokenMissing))?;

    if parts.next().is_some() {
        return Err(AuthError::MalformedHeader(HeaderProblem::NotBearerToken));
    }

    Ok(token)
}
