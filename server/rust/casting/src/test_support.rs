//! テスト用ヘルパー。
//! 統合テスト（tests/integration_test.rs）から利用する。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use casting_auth::{
    AuthGuard, AuthSettings, AuthSwitch, JwksFetchError, JwksFetcher, KeyResolver, SigningKey,
    TokenVerifier,
};

use crate::adapter::handler::AppState;
use crate::adapter::repository::InMemoryCastingStore;
use crate::infrastructure::config::WebConfig;

pub const TEST_AUTH_DOMAIN: &str = "casting.eu.auth0.com";
pub const TEST_AUTH_AUDIENCE: &str = "casting-api";

/// 固定の鍵セットを返す JwksFetcher。ネットワークには接続しない。
#[derive(Default)]
pub struct StaticJwksFetcher {
    keys: Vec<SigningKey>,
}

impl StaticJwksFetcher {
    pub fn new(keys: Vec<SigningKey>) -> Self {
        Self { keys }
    }
}

#[async_trait]
impl JwksFetcher for StaticJwksFetcher {
    async fn fetch_keys(&self, _jwks_url: &str) -> Result<Vec<SigningKey>, JwksFetchError> {
        Ok(self.keys.clone())
    }
}

pub fn test_auth_settings() -> AuthSettings {
    let mut settings = AuthSettings::new(TEST_AUTH_DOMAIN, TEST_AUTH_AUDIENCE);
    settings.client_id = "test-client".to_string();
    settings
}

/// インメモリストアと指定の AuthSwitch で AppState を組み立てる。
pub fn make_test_app_state(
    store: Arc<InMemoryCastingStore>,
    switch: AuthSwitch,
    fetcher: Arc<dyn JwksFetcher>,
) -> anyhow::Result<AppState> {
    let settings = test_auth_settings();
    let resolver = KeyResolver::new(settings.jwks_url(), Duration::ZERO, fetcher);
    let verifier = TokenVerifier::new(&settings, Arc::new(resolver))?;
    let guard = AuthGuard::new(Arc::new(verifier), switch);

    Ok(AppState::new(
        store.clone(),
        store.clone(),
        store,
        guard,
        settings,
        WebConfig::default(),
    ))
}

/// 認可を無効化した AppState。CRUD の振る舞いを検証するテスト向け。
pub fn make_open_app_state(store: Arc<InMemoryCastingStore>) -> anyhow::Result<AppState> {
    let switch = AuthSwitch::new();
    switch.disable_for_testing(true);
    make_test_app_state(store, switch, Arc::new(StaticJwksFetcher::default()))
}
