//! アイデンティティプロバイダーのログイン・ログアウト URL を組み立てる。

use url::Url;

use crate::config::AuthSettings;

/// authorize_url はインプリシットフローのログイン URL を返す。
pub fn authorize_url(settings: &AuthSettings, redirect_uri: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        &format!("https://{}/authorize", settings.domain),
        &[
            ("audience", settings.audience.as_str()),
            ("response_type", "token"),
            ("client_id", settings.client_id.as_str()),
            ("redirect_uri", redirect_uri),
        ],
    )
}

/// logout_url はプロバイダーのセッションを終了する URL を返す。
pub fn logout_url(settings: &AuthSettings, return_to: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        &format!("https://{}/v2/logout", settings.domain),
        &[
            ("client_id", settings.client_id.as_str()),
            ("returnTo", return_to),
        ],
    )
}
