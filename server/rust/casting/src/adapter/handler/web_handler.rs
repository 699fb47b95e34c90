use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use casting_auth::provider::{authorize_url, logout_url};
use tracing::error;

use super::error::AppError;
use super::AppState;

pub async fn health() -> &'static str {
    "Service is up!"
}

pub async fn index() -> Response {
    found("/login")
}

/// プロバイダーのログイン画面へリダイレクトする。ログイン後は /user-home に戻る。
pub async fn login(State(state): State<AppState>) -> Result<Response, AppError> {
    let redirect_uri = state.web.callback_url("/user-home");
    let url = authorize_url(&state.auth_settings, &redirect_uri).map_err(|e| {
        error!(error = %e, domain = %state.auth_settings.domain, "failed to build authorize url");
        AppError::internal()
    })?;
    Ok(found(url.as_str()))
}

pub async fn user_home(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let return_to = state.web.callback_url("/logout");
    let url = logout_url(&state.auth_settings, &return_to).map_err(|e| {
        error!(error = %e, domain = %state.auth_settings.domain, "failed to build logout url");
        AppError::internal()
    })?;

    Ok(Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Casting Agency</title></head>
<body>
<h1>Casting Agency</h1>
<p>You are logged in. The access token is in the URL fragment of this page.</p>
<p><a href="{}">Log out</a></p>
</body>
</html>
"#,
        escape_attr(url.as_str())
    )))
}

pub async fn logout() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head><title>Casting Agency</title></head>
<body>
<h1>Casting Agency</h1>
<p>You have been logged out.</p>
<p><a href="/login">Log in</a></p>
</body>
</html>
"#,
    )
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("https://a/?x=1&y=2"), "https://a/?x=1&amp;y=2");
    }
}
