//! 認可設定。サーバーの config.yaml の `auth` セクションに対応する。

use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use serde::Deserialize;

/// AuthSettings はアイデンティティプロバイダーとの連携設定。
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// プロバイダーのドメイン（例: `tenant.eu.auth0.com`）。
    pub domain: String,
    pub audience: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<String>,
    /// 鍵セットのキャッシュ秒数。0 の場合は検証ごとに取得する。
    #[serde(default = "default_jwks_cache_ttl_secs")]
    pub jwks_cache_ttl_secs: u64,
    #[serde(default = "default_jwks_timeout_secs")]
    pub jwks_timeout_secs: u64,
}

fn default_algorithms() -> Vec<String> {
    vec!["RS256".to_string()]
}

fn default_jwks_cache_ttl_secs() -> u64 {
    600
}

fn default_jwks_timeout_secs() -> u64 {
    5
}

/// 未知の署名アルゴリズム名。
#[derive(thiserror::Error, Debug)]
#[error("unsupported signature algorithm: {0}")]
pub struct UnsupportedAlgorithm(pub String);

impl AuthSettings {
    /// 新しい AuthSettings をデフォルト値で生成する。
    pub fn new(domain: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            audience: audience.into(),
            client_id: String::new(),
            algorithms: default_algorithms(),
            jwks_cache_ttl_secs: default_jwks_cache_ttl_secs(),
            jwks_timeout_secs: default_jwks_timeout_secs(),
        }
    }

    /// 期待する発行者。
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    /// 鍵セットの公開 URL。
    pub fn jwks_url(&self) -> String {
        format!("https://{}/.well-known/jwks.json", self.domain)
    }

    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }

    pub fn jwks_timeout(&self) -> Duration {
        Duration::from_secs(self.jwks_timeout_secs)
    }

    /// 許可する署名アルゴリズムを解釈する。
    pub fn algorithms(&self) -> Result<Vec<Algorithm>, UnsupportedAlgorithm> {
        self.algorithms
            .iter()
            .map(|name| Algorithm::from_str(name).map_err(|_| UnsupportedAlgorithm(name.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_yaml() {
        let yaml = r#"
domain: "casting.eu.auth0.com"
audience: "casting-api"
"#;
        let settings: AuthSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.algorithms, vec!["RS256"]);
        assert_eq!(settings.jwks_cache_ttl_secs, 600);
        assert_eq!(settings.jwks_timeout(), Duration::from_secs(5));
        assert!(settings.client_id.is_empty());
    }

    #[test]
    fn test_issuer_and_jwks_url() {
        let settings = AuthSettings::new("casting.eu.auth0.com", "casting-api");
        assert_eq!(settings.issuer(), "https://casting.eu.auth0.com/");
        assert_eq!(
            settings.jwks_url(),
            "https://casting.eu.auth0.com/.well-known/jwks.json"
        );
    }

    #[test]
    fn test_algorithms_parse() {
        let settings = AuthSettings::new("d", "a");
        assert_eq!(settings.algorithms().unwrap(), vec![Algorithm::RS256]);

        let mut bad = AuthSettings::new("d", "a");
        bad.algorithms = vec!["none".to_string()];
        assert!(bad.algorithms().is_err());
    }
}
