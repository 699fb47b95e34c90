//! JWKS エンドポイントの HTTP 取得テスト（wiremock 使用）。

#[cfg(test)]
mod jwks_wiremock_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use casting_auth::{AuthError, HttpJwksFetcher, JwksFetcher, KeyResolver};

    const JWKS_PATH: &str = "/.well-known/jwks.json";

    fn sample_jwks_response() -> serde_json::Value {
        serde_json::json!({
            "keys": [
                {
                    "kid": "ec-key",
                    "kty": "EC",
                    "crv": "P-256",
                    "x": "f83OJ3D2xF1Bg8vub9tLe1gHMzV76e8Tus9uPHvRVEU",
                    "y": "x_FEzRu9m36HLN_tue659LNpXW6pCyStikYjKIWI5a0"
                },
                {
                    "kid": "test-key-1",
                    "kty": "RSA",
                    "alg": "RS256",
                    "use": "sig",
                    "n": "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw",
                    "e": "AQAB"
                }
            ]
        })
    }

    fn resolver(server: &MockServer, ttl: Duration, timeout: Duration) -> KeyResolver {
        let fetcher = HttpJwksFetcher::new(timeout).unwrap();
        KeyResolver::new(format!("{}{JWKS_PATH}", server.uri()), ttl, Arc::new(fetcher))
    }

    #[tokio::test]
    async fn test_fetch_keys_skips_non_rsa_entries() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_jwks_response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = HttpJwksFetcher::new(Duration::from_secs(5)).unwrap();
        let keys = fetcher
            .fetch_keys(&format!("{}{JWKS_PATH}", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].kid, "test-key-1");
        assert_eq!(keys[0].e, "AQAB");
    }

    #[tokio::test]
    async fn test_resolver_caches_key_set() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_jwks_response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let resolver = resolver(&mock_server, Duration::from_secs(60), Duration::from_secs(5));
        resolver.resolve("test-key-1").await.unwrap();
        resolver.resolve("test-key-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_server_error_is_key_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let resolver = resolver(&mock_server, Duration::ZERO, Duration::from_secs(5));
        assert_eq!(
            resolver.resolve("test-key-1").await.unwrap_err(),
            AuthError::KeyNotFound
        );
    }

    #[tokio::test]
    async fn test_slow_endpoint_times_out_as_key_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(sample_jwks_response())
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let resolver = resolver(&mock_server, Duration::ZERO, Duration::from_millis(200));
        assert_eq!(
            resolver.resolve("test-key-1").await.unwrap_err(),
            AuthError::KeyNotFound
        );
    }

    #[tokio::test]
    async fn test_invalid_json_is_key_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let resolver = resolver(&mock_server, Duration::ZERO, Duration::from_secs(5));
        assert_eq!(
            resolver.resolve("test-key-1").await.unwrap_err(),
            AuthError::KeyNotFound
        );
    }
}
