//! The single request/response contract with the external chat backend.
//!
//! One POST endpoint serves both the zero-message info probe and real
//! message turns; the request shape decides which is which.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::types::{GatewayReply, GatewayRequest};

/// How long a gateway call may stay outstanding before it settles as a
/// transport failure. Keeps a hung backend from wedging the send control.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Transport(String),
    #[error("gateway reply was not valid JSON: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn exchange(&self, request: &GatewayRequest) -> Result<GatewayReply, GatewayError>;
}

#[async_trait]
impl<G: ChatGateway + ?Sized> ChatGateway for Arc<G> {
    async fn exchange(&self, request: &GatewayRequest) -> Result<GatewayReply, GatewayError> {
        (**self).exchange(request).await
    }
}

/// JSON-over-HTTP gateway client.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGateway {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ChatGateway for HttpGateway {
    async fn exchange(&self, request: &GatewayRequest) -> Result<GatewayReply, GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        let reply = response.json::<GatewayReply>().await?;
        Ok(reply)
    }
}
