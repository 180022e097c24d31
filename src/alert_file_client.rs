use crate::error::{CheckError, Result};
use crate::model::Evaluation;
use crate::report_client::ReportClient;
use async_trait::async_trait;
use std::fs;
use tracing::{debug, info};

pub struct AlertFileClientConfig {
    alert_file_path: String,
}

impl AlertFileClientConfig {
    pub fn new(alert_file_path: &str) -> Result<Self> {
        debug!("AlertFileClientConfig::new(alert_file_path: {})", alert_file_path);

        Ok(Self {
            alert_file_path: alert_file_path.into(),
        })
    }
}

/// Leaves an empty marker file behind when a check alerts, for later CI steps to pick up.
pub struct AlertFileClient {
    config: AlertFileClientConfig,
}

impl AlertFileClient {
    pub fn new(config: AlertFileClientConfig) -> AlertFileClient {
        AlertFileClient { config }
    }

    pub fn write_alert_file(&self) -> Result<()> {
        fs::write(&self.config.alert_file_path, b"").map_err(|source| CheckError::SentinelWrite {
            path: self.config.alert_file_path.clone(),
            source,
        })?;

        info!("Wrote alert file at {}", &self.config.alert_file_path);

        Ok(())
    }
}

#[async_trait]
impl ReportClient for AlertFileClient {
    async fn report(&self, evaluation: &Evaluation) -> Result<()> {
        if evaluation.verdict.is_alert() {
            self.write_alert_file()?;
        }

        Ok(())
    }
}
