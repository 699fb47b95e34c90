//! 認可ガード: 抽出 → 検証 → Claims 構築 → 権限確認 を 1 つのゲートにまとめる。

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::claims::Claims;
use crate::error::AuthError;
use crate::extractor::extract_bearer_token;
use crate::verifier::TokenVerifier;

/// 起動時に認可を無効化する環境変数。
pub const AUTH_DEACTIVATED_ENV: &str = "AUTH_DEACTIVATED";

/// AuthSwitch は認可の無効化フラグ。
///
/// ガードの生成時に注入され、クローン間で状態を共有する。
/// 読み書きは SeqCst で行う。
#[derive(Debug, Clone, Default)]
pub struct AuthSwitch(Arc<AtomicBool>);

impl AuthSwitch {
    /// 認可が有効な AuthSwitch を生成する。
    pub fn new() -> Self {
        Self::default()
    }

    /// `AUTH_DEACTIVATED` 環境変数から初期値を決める。
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(AUTH_DEACTIVATED_ENV).ok().as_deref())
    }

    /// 値が `true`（大文字小文字を区別しない）なら無効化された状態で生成する。
    pub fn from_env_value(value: Option<&str>) -> Self {
        let switch = Self::new();
        if value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true")) {
            warn_deactivated(AUTH_DEACTIVATED_ENV);
            switch.0.store(true, Ordering::SeqCst);
        }
        switch
    }

    /// 認可の無効化を切り替える。リクエストデータからは呼び出さないこと。
    pub fn disable_for_testing(&self, disabled: bool) {
        if disabled {
            warn_deactivated("disable_for_testing");
        } else {
            info!("authorization re-enabled");
        }
        self.0.store(disabled, Ordering::SeqCst);
    }

    pub fn is_disabled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

fn warn_deactivated(source: &str) {
    warn!(
        source = %source,
        "!!! AUTHORIZATION IS DISABLED: every protected endpoint accepts requests without a token. \
         Never run a production deployment in this mode !!!"
    );
}

/// AuthGuard は保護対象の処理の前に呼び出す認可ゲート。
#[derive(Clone)]
pub struct AuthGuard {
    verifier: Arc<TokenVerifier>,
    switch: AuthSwitch,
}

impl AuthGuard {
    pub fn new(verifier: Arc<TokenVerifier>, switch: AuthSwitch) -> Self {
        Self { verifier, switch }
    }

    pub fn switch(&self) -> &AuthSwitch {
        &self.switch
    }

    /// authorize はヘッダー値を検証し、要求権限を持つ Claims を返す。
    ///
    /// 無効化されている場合は何も検証せず `Ok(None)` を返す。
    pub async fn authorize(
        &self,
        header: Option<&str>,
        permission: Option<&str>,
    ) -> Result<Option<Claims>, AuthError> {
        if self.switch.is_disabled() {
            return Ok(None);
        }

        let token = extract_bearer_token(header)?;
        let raw = self.verifier.verify(token).await?;
        let claims = Claims::try_from(raw)?;
        claims.check_permission(permission)?;
        Ok(Some(claims))
    }

    /// protect は処理と要求権限を受け取り、ガード付きの処理を返す。
    pub fn protect<F>(&self, permission: Option<&str>, operation: F) -> Protected<F> {
        Protected {
            guard: self.clone(),
            permission: permission.map(str::to_string),
            operation,
        }
    }
}

/// Protected は AuthGuard で保護された処理。
pub struct Protected<F> {
    guard: AuthGuard,
    permission: Option<String>,
    operation: F,
}

impl<F> Protected<F> {
    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    /// 認可に成功した場合のみ、Claims を先頭引数として処理を呼び出す。
    pub async fn call<A, Fut, T>(&self, header: Option<&str>, args: A) -> Result<T, AuthError>
    where
        F: Fn(Option<Claims>, A) -> Fut,
        Fut: Future<Output = T>,
    {
        let claims = self
            .guard
            .authorize(header, self.permission.as_deref())
            .await?;
        Ok((self.operation)(claims, args).await)
    }
}
