use crate::config_client::{optional, required, timeout_seconds_or};
use crate::error::{CheckError, Result};
use crate::metrics_client::MetricsClient;
use crate::model::{CheckConfig, QueryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::env;
use tracing::{debug, info};

pub const DEFAULT_WAVEFRONT_URL: &str = "https://try.wavefront.com";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

pub struct WavefrontClientConfig {
    base_url: String,
    api_token: String,
    timeout_seconds: u64,
}

impl WavefrontClientConfig {
    pub fn new(base_url: &str, api_token: &str, timeout_seconds: u64) -> Result<Self> {
        debug!(
            "WavefrontClientConfig::new(base_url: {}, timeout_seconds: {})",
            base_url, timeout_seconds
        );

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
            timeout_seconds,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = required(&lookup, "API_TOKEN")?;
        let base_url =
            optional(&lookup, "WAVEFRONT_URL").unwrap_or_else(|| DEFAULT_WAVEFRONT_URL.to_string());
        let timeout_seconds = timeout_seconds_or(&lookup, "HTTP_TIMEOUT_SECONDS", DEFAULT_TIMEOUT_SECONDS)?;

        Self::new(&base_url, &api_token, timeout_seconds)
    }
}

/// Parameters for `/api/v2/chart/api`; `start_millis` is the window start in epoch milliseconds.
pub fn query_params(check: &CheckConfig, start_millis: i64) -> Vec<(&'static str, String)> {
    vec![
        ("q", check.query_expression()),
        ("s", start_millis.to_string()),
        ("g", check.granularity().code().to_string()),
        ("sorted", "false".to_string()),
        ("cached", "true".to_string()),
        ("strict", "true".to_string()),
    ]
}

pub struct WavefrontClient {
    config: WavefrontClientConfig,
    client: reqwest::Client,
}

impl WavefrontClient {
    pub fn new(config: WavefrontClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(WavefrontClientConfig::from_env()?)
    }

    pub fn build_request(&self, check: &CheckConfig, now: DateTime<Utc>) -> Result<reqwest::Request> {
        let start = check.window_start(now)?;

        Ok(self
            .client
            .get(format!("{}/api/v2/chart/api", self.config.base_url))
            .query(&query_params(check, start.timestamp_millis()))
            .bearer_auth(&self.config.api_token)
            .build()?)
    }
}

#[async_trait]
impl MetricsClient for WavefrontClient {
    async fn query(&self, check: &CheckConfig) -> Result<QueryResult> {
        let request = self.build_request(check, Utc::now())?;

        info!("Querying Wavefront at {}", request.url());

        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(CheckError::Api {
                service: "Wavefront",
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        debug!("Wavefront responded with {} bytes", body.len());

        QueryResult::from_slice(&body)
    }
}
