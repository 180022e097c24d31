use crate::config_client::{optional, required, timeout_seconds_or};
use crate::error::{CheckError, Result};
use crate::model::{Evaluation, GitlabVariable, Verdict};
use crate::report_client::ReportClient;
use crate::wavefront_client::DEFAULT_TIMEOUT_SECONDS;
use async_trait::async_trait;
use reqwest::Url;
use std::env;
use tracing::{debug, info};

pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";
pub const DEFAULT_PROJECT_NAMESPACE: &str = "vmware-cloud-advocacy";

pub struct GitlabClientConfig {
    base_url: String,
    private_token: String,
    project_path: String,
    variable_key: String,
    timeout_seconds: u64,
}

impl GitlabClientConfig {
    pub fn new(
        base_url: &str,
        private_token: &str,
        project_path: &str,
        variable_key: &str,
        timeout_seconds: u64,
    ) -> Result<Self> {
        debug!(
            "GitlabClientConfig::new(base_url: {}, project_path: {}, variable_key: {})",
            base_url, project_path, variable_key
        );

        Ok(Self {
            base_url: base_url.to_string(),
            private_token: private_token.to_string(),
            project_path: project_path.to_string(),
            variable_key: variable_key.to_string(),
            timeout_seconds,
        })
    }

    /// Returns `None` when GitLab reporting is not configured at all.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let private_token = optional(&lookup, "GITLAB_TOKEN");
        let variable_key = optional(&lookup, "WAVEFRONT_VARIABLE");

        let (private_token, variable_key) = match (private_token, variable_key) {
            (None, None) => return Ok(None),
            (Some(_), None) => return Err(CheckError::ConfigMissing("WAVEFRONT_VARIABLE".into())),
            (None, Some(_)) => return Err(CheckError::ConfigMissing("GITLAB_TOKEN".into())),
            (Some(token), Some(key)) => (token, key),
        };

        let base_url =
            optional(&lookup, "GITLAB_URL").unwrap_or_else(|| DEFAULT_GITLAB_URL.to_string());
        let namespace = optional(&lookup, "GITLAB_PROJECT_NAMESPACE")
            .unwrap_or_else(|| DEFAULT_PROJECT_NAMESPACE.to_string());
        let project_name = required(&lookup, "CI_PROJECT_NAME")?;
        let timeout_seconds = timeout_seconds_or(&lookup, "HTTP_TIMEOUT_SECONDS", DEFAULT_TIMEOUT_SECONDS)?;

        Self::new(
            &base_url,
            &private_token,
            &format!("{}/{}", namespace.trim_end_matches('/'), project_name),
            &variable_key,
            timeout_seconds,
        )
        .map(Some)
    }
}

/// Updates a CI/CD variable on a GitLab project to `passed` or `failed`.
pub struct GitlabClient {
    config: GitlabClientConfig,
    client: reqwest::Client,
}

impl GitlabClient {
    pub fn new(config: GitlabClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, client })
    }

    /// `/api/v4/projects/<namespace%2Fproject>/variables/<key>`
    pub fn variable_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url).map_err(|e| CheckError::ConfigInvalid {
            name: "GITLAB_URL".to_string(),
            value: self.config.base_url.clone(),
            reason: e.to_string(),
        })?;

        url.path_segments_mut()
            .map_err(|_| CheckError::ConfigInvalid {
                name: "GITLAB_URL".to_string(),
                value: self.config.base_url.clone(),
                reason: "cannot be a base url".to_string(),
            })?
            .pop_if_empty()
            .extend(&[
                "api",
                "v4",
                "projects",
                self.config.project_path.as_str(),
                "variables",
                self.config.variable_key.as_str(),
            ]);

        Ok(url)
    }

    pub fn build_request(&self, verdict: Verdict) -> Result<reqwest::Request> {
        let variable = GitlabVariable::new(&self.config.variable_key, verdict.as_str());

        Ok(self
            .client
            .put(self.variable_url()?)
            .header("private-token", &self.config.private_token)
            .json(&variable)
            .build()?)
    }

    pub async fn update_variable(&self, verdict: Verdict) -> Result<()> {
        let request = self.build_request(verdict)?;

        info!(
            "Setting variable {} to {} at {}",
            self.config.variable_key,
            verdict,
            request.url()
        );

        let response = self.client.execute(request).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CheckError::Api {
                service: "GitLab",
                status: status.as_u16(),
                body,
            });
        }

        debug!("GitLab responded with {}", status);

        Ok(())
    }
}

#[async_trait]
impl ReportClient for GitlabClient {
    async fn report(&self, evaluation: &Evaluation) -> Result<()> {
        self.update_variable(evaluation.verdict).await
    }
}
