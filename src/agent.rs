//! Inference client for the hosted summarisation model.
//!
//! Uses reqwest to post the input text and decode whatever JSON comes back.

use crate::config::{Config, ConfigError};
use crate::summary::InferenceRequest;
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// User-Agent string identifying this client
const USER_AGENT: &str = concat!(
    "qasum/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/cladam/qasum)"
);

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Something that can turn text into a decoded inference response.
pub trait Summarizer {
    /// Send `inputs` to the model and return the decoded body.
    fn summarize(&self, inputs: &str) -> impl Future<Output = Result<Value, AgentError>> + Send;
}

/// reqwest-backed client for the configured endpoint.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl InferenceClient {
    /// Build a client from configuration; fails if no API key is available.
    pub fn new(config: &Config) -> Result<Self, AgentError> {
        let api_key = config.api_key()?.to_string();

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.api.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.api.endpoint.clone(),
            api_key,
        })
    }

    /// The endpoint requests are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Summarizer for InferenceClient {
    async fn summarize(&self, inputs: &str) -> Result<Value, AgentError> {
        tracing::info!(
            endpoint = %self.endpoint,
            chars = inputs.chars().count(),
            "sending summarisation request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&InferenceRequest { inputs })
            .send()
            .await?;

        // The API reports errors as JSON bodies on non-2xx statuses, so the
        // status is logged but never short-circuits decoding.
        let status = response.status();
        let bytes = response.bytes().await?;
        tracing::debug!(%status, len = bytes.len(), "received response");

        let body: Value = serde_json::from_slice(&bytes)?;
        Ok(body)
    }
}
