use crate::config::UpstreamConfig;
use crate::models::{SatellitePosition, UpstreamPosition};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info};

/// Ways a single upstream fetch can fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("API request timed out")]
    Timeout,
    #[error("Failed to fetch ISS data: {0}")]
    RequestFailed(String),
    #[error("Malformed ISS data: {0}")]
    MalformedResponse(String),
}

/// Anything that can produce the current satellite position.
///
/// The HTTP handler is generic over this so tests can script upstream
/// results without a network.
pub trait PositionSource: Send + Sync + 'static {
    fn fetch_position(
        &self,
    ) -> impl Future<Output = Result<SatellitePosition, FetchError>> + Send;
}

/// Client for the wheretheiss.at satellite endpoint.
pub struct IssClient {
    client: Client,
    api_url: String,
}

impl IssClient {
    pub fn new(config: &UpstreamConfig) -> color_eyre::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::try_from_secs_f64(config.timeout_seconds)?)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Performs exactly one GET and validates the body. Every outcome is
    /// logged once.
    pub async fn fetch(&self) -> Result<SatellitePosition, FetchError> {
        let result = self.request().await;

        match &result {
            Ok(pos) => info!(
                "ISS Location: {}, {}, {:?}, {:?}, {}",
                pos.latitude,
                pos.longitude,
                pos.altitude,
                pos.velocity,
                pos.visibility.as_ref().unwrap_or(&serde_json::Value::Null)
            ),
            Err(FetchError::Timeout) => error!("API request timed out."),
            Err(e) => error!("{}", e),
        }

        result
    }

    async fn request(&self) -> Result<SatellitePosition, FetchError> {
        let body = self
            .client
            .get(&self.api_url)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(classify)?
            .bytes()
            .await
            .map_err(classify)?;

        let upstream: UpstreamPosition = serde_json::from_slice(&body)
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

        upstream
            .validate()
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))
    }
}

impl PositionSource for IssClient {
    fn fetch_position(
        &self,
    ) -> impl Future<Output = Result<SatellitePosition, FetchError>> + Send {
        self.fetch()
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::RequestFailed(e.to_string())
    }
}
