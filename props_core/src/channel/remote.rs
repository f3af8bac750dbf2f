//! # Remote Network Channel
//!
//! Performs a computation against an HTTP(S) endpoint:
//!
//! ```text
//! POST {base_url}/{command}
//! Content-Type: application/json
//!
//! {"number_of_model": 1, "fibre_content": 0.2, ...}
//! ```
//!
//! The response body must be a JSON array of numbers. Any transport failure,
//! non-2xx status or unparseable body is a `ChannelInvocation` error.

use std::time::Duration;

use async_trait::async_trait;

use super::{Channel, ChannelRoute};
use crate::errors::{DispatchError, DispatchResult};
use crate::kind::ComputationKind;
use crate::normalize::normalize;
use crate::request::ComputationRequest;
use crate::result::ComputationResult;

/// Current library version (from Cargo.toml)
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Channel backed by a remote computation endpoint.
#[derive(Debug, Clone)]
pub struct RemoteNetworkChannel {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteNetworkChannel {
    /// Create a channel for `base_url`.
    ///
    /// `timeout` is handed to the HTTP client as-is; `None` keeps the
    /// client's default.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> DispatchResult<Self> {
        let base_url = base_url.into();
        let mut builder = reqwest::Client::builder().user_agent(format!("MatProps/{}", CURRENT_VERSION));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            DispatchError::channel_invocation(
                ChannelRoute::Remote.name(),
                format!("Failed to create HTTP client: {}", e),
            )
        })?;

        Ok(RemoteNetworkChannel {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint URL for a kind
    pub fn endpoint(&self, kind: ComputationKind) -> String {
        format!("{}/{}", self.base_url, kind.command())
    }
}

#[async_trait]
impl Channel for RemoteNetworkChannel {
    fn route(&self) -> ChannelRoute {
        ChannelRoute::Remote
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn attempt_invoke(
        &self,
        kind: ComputationKind,
        request: &ComputationRequest,
    ) -> DispatchResult<ComputationResult> {
        let channel = self.route().name();
        let url = self.endpoint(kind);

        let response = self
            .client
            .post(&url)
            .json(&request.to_payload())
            .send()
            .await
            .map_err(|e| DispatchError::channel_invocation(channel, format!("Network error: {}", e)))?;

        if !response.status().is_success() {
            return Err(DispatchError::channel_invocation(
                channel,
                format!("{} returned {}", url, response.status()),
            ));
        }

        let values: Vec<f64> = response.json().await.map_err(|e| {
            DispatchError::channel_invocation(channel, format!("Failed to parse response: {}", e))
        })?;

        normalize(kind, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let channel = RemoteNetworkChannel::new("http://127.0.0.1:8000/api/", None).unwrap();
        assert_eq!(channel.base_url(), "http://127.0.0.1:8000/api");
        assert_eq!(
            channel.endpoint(ComputationKind::ThermalExpansionForHoneycomb),
            "http://127.0.0.1:8000/api/thermal_expansion_for_honeycomb"
        );
    }

    #[test]
    fn test_remote_always_available() {
        let channel = RemoteNetworkChannel::new("http://127.0.0.1:8000", Some(Duration::from_secs(5))).unwrap();
        assert!(channel.is_available());
        assert_eq!(channel.route(), ChannelRoute::Remote);
    }

    #[tokio::test]
    async fn test_connection_refused_is_invocation_error() {
        // Bind then drop to get a port with nothing listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let channel = RemoteNetworkChannel::new(format!("http://127.0.0.1:{}", port), None).unwrap();
        let request = ComputationRequest::builder(1)
            .param("fibre_content", 0.2)
            .param("k_for_fiber", 100.0)
            .param("k_for_matrix", 1.0)
            .build()
            .unwrap();
        let err = channel
            .attempt_invoke(ComputationKind::ThermalConductivityForUnidirectionalComposite, &request)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "CHANNEL_INVOCATION_ERROR");
    }
}
