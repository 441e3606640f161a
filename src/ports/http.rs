use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::DomainError;

/// HTTP client port for all network requests.
/// All network traffic must go through this interface.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a POST request with a JSON body and decode the JSON response.
    ///
    /// `bearer` is sent as an `Authorization: Bearer` header when present.
    async fn post_json<T: Serialize + Send + Sync, R: DeserializeOwned>(
        &self,
        url: &str,
        bearer: Option<&str>,
        body: &T,
        timeout: Duration,
    ) -> Result<R, DomainError>;

    /// Check if network requests are currently blocked.
    fn is_network_blocked(&self) -> bool;

    /// Get the list of allowed domains.
    fn allowed_domains(&self) -> Vec<String>;
}
