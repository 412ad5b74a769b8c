//! Minimal Consul HTTP API client (KV reads, key listing, leader status)

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

/// Header Consul reads the ACL token from
const TOKEN_HEADER: &str = "X-Consul-Token";

/// Errors raised by [`ConsulClient`]
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid Consul address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("permission denied ({status}): {message}")]
    PermissionDenied { status: u16, message: String },

    #[error("unexpected response ({status}): {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("invalid KV value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl ClientError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, ClientError::PermissionDenied { .. })
    }
}

/// Settings shared by every client a provider creates
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    /// ACL token; `None` sends no token header
    pub token: Option<String>,
    /// Datacenter every query is scoped to
    pub datacenter: Option<String>,
    /// Per-request timeout
    pub timeout: Option<Duration>,
}

/// One entry of a `GET /v1/kv/<key>` response
#[derive(Debug, Deserialize)]
struct KvPair {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "Value")]
    value: Option<String>,
}

/// HTTP client bound to a single Consul agent
#[derive(Debug)]
pub struct ConsulClient {
    http: Client,
    address: String,
    base: Url,
    settings: ClientSettings,
}

impl ConsulClient {
    /// Create a client for `address` (scheme optional, defaults to http)
    pub fn new(address: &str, settings: &ClientSettings) -> Result<Self, ClientError> {
        let address = normalize_address(address);
        let base = Url::parse(&address).map_err(|e| ClientError::InvalidAddress {
            address: address.clone(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidAddress {
                address,
                reason: "not a hierarchical URL".to_string(),
            });
        }

        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            address,
            base,
            settings: settings.clone(),
        })
    }

    /// Normalized base address (scheme included, no trailing slash)
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Read a single key; `None` when the key does not exist
    pub async fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        let response = self.request(&["kv"], key).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let pairs: Vec<KvPair> = response.json().await?;
                let Some(pair) = pairs.into_iter().next() else {
                    return Ok(None);
                };
                decode_value(&pair).map(Some)
            }
            status => Err(status_error(status, response.text().await.unwrap_or_default())),
        }
    }

    /// List every key under `prefix`; empty when nothing matches
    pub async fn keys(&self, prefix: &str) -> Result<Vec<String>, ClientError> {
        let response = self
            .request(&["kv"], prefix)
            .query(&[("keys", "")])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            status if status.is_success() => Ok(response.json().await?),
            status => Err(status_error(status, response.text().await.unwrap_or_default())),
        }
    }

    /// Current raft leader (`GET /v1/status/leader`)
    pub async fn leader(&self) -> Result<String, ClientError> {
        let response = self.request(&["status", "leader"], "").send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, response.text().await.unwrap_or_default()));
        }
        Ok(response.json().await?)
    }

    fn request(&self, endpoint: &[&str], key: &str) -> RequestBuilder {
        let mut request = self.http.get(self.url(endpoint, key));
        if let Some(token) = self.settings.token.as_deref() {
            request = request.header(TOKEN_HEADER, token);
        }
        if let Some(dc) = self.settings.datacenter.as_deref() {
            request = request.query(&[("dc", dc)]);
        }
        request
    }

    /// `<base>/v1/<endpoint>/<key>`, each key segment percent-encoded
    fn url(&self, endpoint: &[&str], key: &str) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`: the base always has path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("v1").extend(endpoint);
            let key = key.trim_start_matches('/');
            if !key.is_empty() {
                segments.extend(key.split('/'));
            }
        }
        url
    }
}

/// Add a default `http://` scheme and drop trailing slashes
pub fn normalize_address(address: &str) -> String {
    let address = address.trim().trim_end_matches('/');
    if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    }
}

fn decode_value(pair: &KvPair) -> Result<String, ClientError> {
    let Some(encoded) = pair.value.as_deref() else {
        return Ok(String::new());
    };
    let bytes = STANDARD.decode(encoded).map_err(|e| ClientError::InvalidValue {
        key: pair.key.clone(),
        message: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| ClientError::InvalidValue {
        key: pair.key.clone(),
        message: e.to_string(),
    })
}

fn status_error(status: StatusCode, body: String) -> ClientError {
    let message = body.trim().to_string();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::PermissionDenied {
            status: status.as_u16(),
            message,
        },
        _ => ClientError::UnexpectedStatus {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("consul.internal:8500"), "http://consul.internal:8500");
        assert_eq!(normalize_address("https://consul.internal/"), "https://consul.internal");
        assert_eq!(normalize_address(" 127.0.0.1:8500 "), "http://127.0.0.1:8500");
    }

    #[test]
    fn test_invalid_address() {
        let err = ConsulClient::new("http://exa mple:8500", &ClientSettings::default()).unwrap_err();
        assert!(matches!(err, ClientError::InvalidAddress { .. }));
    }

    #[test]
    fn test_decode_value() {
        let pair = KvPair {
            key: "a".to_string(),
            value: Some(STANDARD.encode("hello")),
        };
        assert_eq!(decode_value(&pair).unwrap(), "hello");

        let empty = KvPair {
            key: "a".to_string(),
            value: None,
        };
        assert_eq!(decode_value(&empty).unwrap(), "");

        let garbage = KvPair {
            key: "a".to_string(),
            value: Some("***".to_string()),
        };
        assert!(matches!(decode_value(&garbage), Err(ClientError::InvalidValue { .. })));

        let binary = KvPair {
            key: "a".to_string(),
            value: Some(STANDARD.encode([0xff, 0xfe, 0x00])),
        };
        assert!(matches!(decode_value(&binary), Err(ClientError::InvalidValue { .. })));
    }

    #[test]
    fn test_urls_escape_key_segments() {
        let client = ConsulClient::new("consul.internal:8500", &ClientSettings::default()).unwrap();
        assert_eq!(
            client.url(&["kv"], "services/auth/dev/base_url").as_str(),
            "http://consul.internal:8500/v1/kv/services/auth/dev/base_url"
        );
        assert_eq!(
            client.url(&["kv"], "/app?raw#frag").as_str(),
            "http://consul.internal:8500/v1/kv/app%3Fraw%23frag"
        );
        assert_eq!(
            client.url(&["kv"], "services/").as_str(),
            "http://consul.internal:8500/v1/kv/services/"
        );
        assert_eq!(
            client.url(&["status", "leader"], "").as_str(),
            "http://consul.internal:8500/v1/status/leader"
        );

        let prefixed = ConsulClient::new("https://gw.internal/consul/", &ClientSettings::default()).unwrap();
        assert_eq!(
            prefixed.url(&["kv"], "a b").as_str(),
            "https://gw.internal/consul/v1/kv/a%20b"
        );
    }

    #[tokio::test]
    async fn test_get_does_not_truncate_key_at_query_marker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/kv/app"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "Key": "app",
                "Value": STANDARD.encode("OTHER-SECRET"),
            }])))
            .mount(&server)
            .await;

        let client = ConsulClient::new(&server.uri(), &ClientSettings::default()).unwrap();
        assert_eq!(client.get("app?raw").await.unwrap(), None);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.path(), "/v1/kv/app%3Fraw");
    }

    #[tokio::test]
    async fn test_get_sends_token_and_datacenter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/kv/services/auth/dev/base_url"))
            .and(header("X-Consul-Token", "tok"))
            .and(query_param("dc", "dc1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "Key": "services/auth/dev/base_url",
                "Value": STANDARD.encode("https://auth.dev.internal"),
                "Flags": 0,
                "CreateIndex": 10,
                "ModifyIndex": 12
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let settings = ClientSettings {
            token: Some("tok".to_string()),
            datacenter: Some("dc1".to_string()),
            timeout: Some(Duration::from_secs(5)),
        };
        let client = ConsulClient::new(&server.uri(), &settings).unwrap();
        let value = client.get("/services/auth/dev/base_url").await.unwrap();
        assert_eq!(value.as_deref(), Some("https://auth.dev.internal"));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/kv/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ConsulClient::new(&server.uri(), &ClientSettings::default()).unwrap();
        assert_eq!(client.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_forbidden_is_permission_denied() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/kv/secret"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Permission denied"))
            .mount(&server)
            .await;

        let client = ConsulClient::new(&server.uri(), &ClientSettings::default()).unwrap();
        let err = client.get("secret").await.unwrap_err();
        assert!(err.is_permission_denied());
        assert_eq!(err.to_string(), "permission denied (403): Permission denied");
    }

    #[tokio::test]
    async fn test_keys_and_leader() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/kv/services/"))
            .and(query_param("keys", ""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                "services/auth/dev/base_url",
                "services/auth/prod/base_url"
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/status/leader"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("10.0.0.1:8300")))
            .mount(&server)
            .await;

        let client = ConsulClient::new(&server.uri(), &ClientSettings::default()).unwrap();
        let keys = client.keys("services/").await.unwrap();
        assert_eq!(keys, vec!["services/auth/dev/base_url", "services/auth/prod/base_url"]);
        assert_eq!(client.leader().await.unwrap(), "10.0.0.1:8300");
    }
}
