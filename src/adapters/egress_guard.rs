use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::domain::config::NetworkConfig;
use crate::domain::DomainError;
use crate::ports::HttpClient;

/// The single HTTP exit of the application.
///
/// Every request is checked against the offline switch and the host allowlist
/// before a socket is opened.
pub struct EgressGuard {
    client: Client,
    offline: bool,
    allowed_domains: Vec<String>,
}

impl EgressGuard {
    pub fn new(config: &NetworkConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .use_rustls_tls()
            .user_agent(concat!("DeviceCheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::HttpRequest(format!("cannot build HTTP client: {}", e)))?;

        debug!(
            offline = config.offline,
            allowed_domains = ?config.allowed_domains,
            "Egress guard ready"
        );

        Ok(Self {
            client,
            offline: config.offline,
            allowed_domains: config.allowed_domains.clone(),
        })
    }

    /// Parse `url` and refuse it unless the guard lets it through.
    fn admit(&self, url: &str) -> Result<Url, DomainError> {
        if self.offline {
            warn!(url, "Request refused: offline");
            return Err(DomainError::NetworkBlocked {
                reason: "offline mode is on".to_string(),
            });
        }

        let parsed = Url::parse(url).map_err(|e| DomainError::HttpRequest(format!("{}: {}", url, e)))?;
        let Some(host) = parsed.host_str() else {
            return Err(DomainError::HttpRequest(format!("{}: URL has no host", url)));
        };

        if !host_permitted(host, &self.allowed_domains) {
            warn!(url, host, "Request refused: host not allowed");
            return Err(DomainError::NetworkBlocked {
                reason: format!("host '{}' is not in allowed_domains", host),
            });
        }

        Ok(parsed)
    }
}

/// Exact match or a subdomain of an allowed entry.
fn host_permitted(host: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|domain| {
        host == domain
            || host
                .strip_suffix(domain.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

#[async_trait]
impl HttpClient for EgressGuard {
    async fn post_json<T: Serialize + Send + Sync, R: DeserializeOwned>(
        &self,
        url: &str,
        bearer: Option<&str>,
        body: &T,
        timeout: Duration,
    ) -> Result<R, DomainError> {
        let target = self.admit(url)?;

        let mut request = self.client.post(target).timeout(timeout).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                DomainError::HttpRequest(format!("no answer from {} within {}s", url, timeout.as_secs()))
            } else {
                DomainError::HttpRequest(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::HttpRequest(format!("{} answered HTTP {}", url, status)));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::HttpRequest(format!("unreadable response from {}: {}", url, e)))
    }

    fn is_network_blocked(&self) -> bool {
        self.offline
    }

    fn allowed_domains(&self) -> Vec<String> {
        self.allowed_domains.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str = "https://api.deepseek.com/v1/chat/completions";

    fn guard(offline: bool) -> EgressGuard {
        EgressGuard::new(&NetworkConfig {
            offline,
            ..NetworkConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_offline_refuses_allowed_host() {
        let guard = guard(true);
        assert!(guard.is_network_blocked());
        assert!(matches!(guard.admit(ENDPOINT), Err(DomainError::NetworkBlocked { .. })));
    }

    #[test]
    fn test_allowed_host_admitted() {
        let guard = guard(false);
        assert_eq!(guard.admit(ENDPOINT).unwrap().host_str(), Some("api.deepseek.com"));
    }

    #[test]
    fn test_host_matching() {
        let allowed = vec!["api.deepseek.com".to_string()];
        assert!(host_permitted("api.deepseek.com", &allowed));
        assert!(host_permitted("eu.api.deepseek.com", &allowed));
        assert!(!host_permitted("notapi.deepseek.com", &allowed));
        assert!(!host_permitted("api.deepseek.com.attacker.net", &allowed));
        assert!(!host_permitted("api.deepseek.com", &[]));
    }

    #[test]
    fn test_unknown_host_refused() {
        let guard = guard(false);
        assert!(matches!(
            guard.admit("https://collector.example.com/upload"),
            Err(DomainError::NetworkBlocked { .. })
        ));
        assert_eq!(guard.allowed_domains(), vec!["api.deepseek.com".to_string()]);
    }

    #[tokio::test]
    async fn test_post_refused_before_any_io() {
        let guard = guard(true);
        let result: Result<serde_json::Value, _> = guard
            .post_json(ENDPOINT, None, &serde_json::json!({}), Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(DomainError::NetworkBlocked { .. })));
    }
}
