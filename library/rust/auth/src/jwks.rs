//! 鍵セット（JWKS）の取得と、トークンの kid に一致する署名鍵の選択。

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::AuthSettings;
use crate::error::AuthError;

/// SigningKey はプロバイダーが公開する RSA 公開鍵。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningKey {
    pub kid: String,
    pub kty: String,
    pub usage: Option<String>,
    /// base64url エンコードされたモジュラス。
    pub n: String,
    /// base64url エンコードされた指数。
    pub e: String,
}

/// JWKS レスポンスの構造体。
#[derive(Debug, Deserialize)]
struct JwksDocument {
    #[serde(default)]
    keys: Vec<JwkEntry>,
}

/// 個々の JWK。RSA 以外の鍵も含まれうるため全フィールドを任意とする。
#[derive(Debug, Deserialize)]
struct JwkEntry {
    kid: Option<String>,
    #[serde(default)]
    kty: String,
    #[serde(rename = "use")]
    usage: Option<String>,
    n: Option<String>,
    e: Option<String>,
}

impl JwkEntry {
    fn into_signing_key(self) -> Option<SigningKey> {
        Some(SigningKey {
            kid: self.kid?,
            kty: self.kty,
            usage: self.usage,
            n: self.n?,
            e: self.e?,
        })
    }
}

/// JwksFetchError は鍵セット取得の失敗。
#[derive(thiserror::Error, Debug)]
pub enum JwksFetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("key set request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("key set unavailable: {0}")]
    Unavailable(String),
}

/// JwksFetcher は鍵セットエンドポイントからの取得を抽象化するトレイト。
#[async_trait::async_trait]
pub trait JwksFetcher: Send + Sync {
    async fn fetch_keys(&self, jwks_url: &str) -> Result<Vec<SigningKey>, JwksFetchError>;
}

/// HttpJwksFetcher は HTTP GET で鍵セットを取得する。
pub struct HttpJwksFetcher {
    client: reqwest::Client,
}

impl HttpJwksFetcher {
    /// タイムアウト付きの HttpJwksFetcher を生成する。
    pub fn new(timeout: Duration) -> Result<Self, JwksFetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(JwksFetchError::Client)?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl JwksFetcher for HttpJwksFetcher {
    async fn fetch_keys(&self, jwks_url: &str) -> Result<Vec<SigningKey>, JwksFetchError> {
        let doc: JwksDocument = self
            .client
            .get(jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(doc
            .keys
            .into_iter()
            .filter_map(JwkEntry::into_signing_key)
            .collect())
    }
}

/// 鍵セット再取得の最短間隔の既定値。
pub const DEFAULT_REFETCH_INTERVAL: Duration = Duration::from_secs(5);

/// 鍵セットキャッシュ。
struct JwksCache {
    keys: Vec<SigningKey>,
    fetched_at: Instant,
}

/// KeyResolver は kid に一致する署名鍵を返す。
///
/// cache_ttl が 0 の場合は解決ごとに鍵セットを取得する。
/// キャッシュ済みの鍵セットに kid が無い場合は鍵ローテーションとみなし 1 度だけ再取得する。
/// 直近の取得から refetch_interval 未満の再取得は行わず、キャッシュ済みの鍵セットを使う。
pub struct KeyResolver {
    jwks_url: String,
    cache_ttl: Duration,
    refetch_interval: Duration,
    cache: RwLock<Option<JwksCache>>,
    fetcher: Arc<dyn JwksFetcher>,
}

impl KeyResolver {
    pub fn new(jwks_url: impl Into<String>, cache_ttl: Duration, fetcher: Arc<dyn JwksFetcher>) -> Self {
        Self {
            jwks_url: jwks_url.into(),
            cache_ttl,
            refetch_interval: DEFAULT_REFETCH_INTERVAL,
            cache: RwLock::new(None),
            fetcher,
        }
    }

    /// kid 不一致時の再取得の最短間隔を設定する。
    pub fn with_refetch_interval(mut self, interval: Duration) -> Self {
        self.refetch_interval = interval;
        self
    }

    /// 設定から HTTP フェッチャーを使う KeyResolver を生成する。
    pub fn from_settings(settings: &AuthSettings) -> Result<Self, JwksFetchError> {
        let fetcher = HttpJwksFetcher::new(settings.jwks_timeout())?;
        Ok(Self::new(
            settings.jwks_url(),
            settings.jwks_cache_ttl(),
            Arc::new(fetcher),
        ))
    }

    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// kid に一致する最初の鍵を返す。
    pub async fn resolve(&self, kid: &str) -> Result<SigningKey, AuthError> {
        let (keys, from_cache) = self.keys().await?;
        if let Some(key) = find_key(&keys, kid) {
            return Ok(key);
        }

        if from_cache {
            debug!(kid = %kid, "kid not in cached key set, refetching");
            let keys = self.refetch().await?;
            if let Some(key) = find_key(&keys, kid) {
                return Ok(key);
            }
        }

        debug!(kid = %kid, "no signing key matches kid");
        Err(AuthError::KeyNotFound)
    }

    /// キャッシュを無効化する。
    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        *cache = None;
    }

    /// キャッシュ済みなら (keys, true)、取得したなら (keys, false) を返す。
    async fn keys(&self) -> Result<(Vec<SigningKey>, bool), AuthError> {
        if self.cache_ttl.is_zero() {
            return Ok((self.fetch().await?, false));
        }

        // Read lock でキャッシュを確認
        {
            let cache = self.cache.read().await;
            if let Some(keys) = self.fresh_keys(&cache) {
                return Ok((keys, true));
            }
        }

        let mut cache = self.cache.write().await;

        // ダブルチェック
        if let Some(keys) = self.fresh_keys(&cache) {
            return Ok((keys, true));
        }

        let keys = self.fetch().await?;
        *cache = Some(JwksCache {
            keys: keys.clone(),
            fetched_at: Instant::now(),
        });
        Ok((keys, false))
    }

    async fn refetch(&self) -> Result<Vec<SigningKey>, AuthError> {
        let mut cache = self.cache.write().await;

        // 並行する再取得や未知 kid の連続で鍵セットエンドポイントを叩かない
        if let Some(recent) = cache
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < self.refetch_interval)
        {
            debug!("key set fetched recently, skipping refetch");
            return Ok(recent.keys.clone());
        }

        let keys = self.fetch().await?;
        *cache = Some(JwksCache {
            keys: keys.clone(),
            fetched_at: Instant::now(),
        });
        Ok(keys)
    }

    fn fresh_keys(&self, cache: &Option<JwksCache>) -> Option<Vec<SigningKey>> {
        cache
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < self.cache_ttl)
            .map(|c| c.keys.clone())
    }

    async fn fetch(&self) -> Result<Vec<SigningKey>, AuthError> {
        self.fetcher.fetch_keys(&self.jwks_url).await.map_err(|e| {
            warn!(error = %e, url = %self.jwks_url, "failed to fetch signing keys");
            AuthError::KeyNotFound
        })
    }
}

fn find_key(keys: &[SigningKey], kid: &str) -> Option<SigningKey> {
    keys.iter().find(|k| k.kid == kid).cloned()
}
