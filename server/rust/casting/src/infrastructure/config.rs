use casting_auth::AuthSettings;
use serde::Deserialize;

use crate::infrastructure::database::DatabaseConfig;

/// Config はアプリケーション全体の設定。
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    pub auth: AuthSettings,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// AppConfig はアプリケーション設定。
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_environment() -> String {
    "dev".to_string()
}

/// ServerConfig はサーバー設定。
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// WebConfig はログイン・ログアウト画面のコールバック先。
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_callback_scheme")]
    pub callback_scheme: String,
    #[serde(default = "default_callback_server")]
    pub callback_server: String,
}

fn default_callback_scheme() -> String {
    "http".to_string()
}

fn default_callback_server() -> String {
    "127.0.0.1:5000".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            callback_scheme: default_callback_scheme(),
            callback_server: default_callback_server(),
        }
    }
}

impl WebConfig {
    /// コールバック先の絶対 URL を返す。
    pub fn callback_url(&self, path: &str) -> String {
        format!("{}://{}{}", self.callback_scheme, self.callback_server, path)
    }
}

/// LogConfig はログ出力設定。
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

impl Config {
    /// YAML ファイルから設定を読み込む。
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml = r#"
app:
  name: "casting-server"
  environment: "staging"
server:
  port: 8080
database:
  host: "localhost"
  name: "casting"
  user: "app"
  password: "secret"
auth:
  domain: "casting.eu.auth0.com"
  audience: "casting-api"
  client_id: "abc123"
web:
  callback_scheme: "https"
  callback_server: "casting.example.com"
log:
  format: "text"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.app.name, "casting-server");
        assert_eq!(config.app.environment, "staging");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.unwrap().name, "casting");
        assert_eq!(config.auth.issuer(), "https://casting.eu.auth0.com/");
        assert_eq!(config.auth.jwks_cache_ttl_secs, 600);
        assert_eq!(
            config.web.callback_url("/user-home"),
            "https://casting.example.com/user-home"
        );
        assert_eq!(config.log.format, "text");
    }

    #[test]
    fn test_config_defaults() {
        let yaml = r#"
app:
  name: "casting-server"
server: {}
auth:
  domain: "casting.eu.auth0.com"
  audience: "casting-api"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.app.version, "0.1.0");
        assert_eq!(config.app.environment, "dev");
        assert_eq!(config.server.port, 5000);
        assert!(config.database.is_none());
        assert_eq!(config.web.callback_url("/logout"), "http://127.0.0.1:5000/logout");
        assert_eq!(config.log.format, "json");
    }
}
