use crate::alert_file_client::{AlertFileClient, AlertFileClientConfig};
use crate::config_client::{ConfigClient, ConfigClientConfig};
use crate::error::Result;
use crate::gitlab_client::{GitlabClient, GitlabClientConfig};
use crate::metrics_client::MetricsClient;
use crate::model::{CheckConfig, Evaluation};
use crate::report_client::ReportClient;
use crate::wavefront_client::WavefrontClient;
use tracing::info;

pub struct CheckServiceConfig {
    check: CheckConfig,
    metrics_client: Box<dyn MetricsClient>,
    report_clients: Vec<Box<dyn ReportClient>>,
}

impl CheckServiceConfig {
    pub fn new(
        check: CheckConfig,
        metrics_client: Box<dyn MetricsClient>,
        report_clients: Vec<Box<dyn ReportClient>>,
    ) -> Result<Self> {
        Ok(Self {
            check,
            metrics_client,
            report_clients,
        })
    }

    /// Wires the Wavefront client, the alert file and, when configured, GitLab.
    pub fn from_env() -> Result<Self> {
        let config_client = ConfigClient::new(ConfigClientConfig::from_env()?);
        let check = config_client.read_check_config()?;

        let metrics_client = WavefrontClient::from_env()?;

        let mut report_clients: Vec<Box<dyn ReportClient>> = vec![Box::new(AlertFileClient::new(
            AlertFileClientConfig::new(&check.alert_file)?,
        ))];
        if let Some(gitlab_config) = GitlabClientConfig::from_env()? {
            report_clients.push(Box::new(GitlabClient::new(gitlab_config)?));
        }

        Self::new(check, Box::new(metrics_client), report_clients)
    }
}

pub struct CheckService {
    config: CheckServiceConfig,
}

impl CheckService {
    pub fn new(config: CheckServiceConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(CheckServiceConfig::from_env()?))
    }

    /// Queries the metric, evaluates it against the threshold and hands the
    /// result to every report client in order. Any error stops the run before
    /// the remaining reports.
    pub async fn run(&self) -> Result<Evaluation> {
        let check = &self.config.check;

        let result = self.config.metrics_client.query(check).await?;
        let series = check.selector().select(&result)?;

        info!(
            "Selected series {} with {} points out of {}",
            series.label,
            series.data.len(),
            result.series().len()
        );

        let evaluation = Evaluation::new(&check.metric, series.average()?, check.threshold);

        info!(
            "Average {} is {} against threshold {}: {}",
            evaluation.metric, evaluation.average, evaluation.threshold, evaluation.verdict
        );

        for report_client in &self.config.report_clients {
            report_client.report(&evaluation).await?;
        }

        Ok(evaluation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckError;
    use crate::model::{ChartResponse, DataPoint, MetricSeries, QueryResult, Verdict};
    use assert2::{check, let_assert};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct FakeMetricsClient {
        result: QueryResult,
    }

    #[async_trait]
    impl MetricsClient for FakeMetricsClient {
        async fn query(&self, _check: &CheckConfig) -> Result<QueryResult> {
            Ok(self.result.clone())
        }
    }

    struct FailingMetricsClient;

    #[async_trait]
    impl MetricsClient for FailingMetricsClient {
        async fn query(&self, _check: &CheckConfig) -> Result<QueryResult> {
            Err(CheckError::Api {
                service: "Wavefront",
                status: 401,
                body: "unauthorized".to_string(),
            })
        }
    }

    #[derive(Clone, Default)]
    struct RecordingReportClient {
        reported: Arc<Mutex<Vec<Verdict>>>,
    }

    #[async_trait]
    impl ReportClient for RecordingReportClient {
        async fn report(&self, evaluation: &Evaluation) -> Result<()> {
            self.reported.lock().unwrap().push(evaluation.verdict);
            Ok(())
        }
    }

    fn pod_series(pod_name: &str, values: &[f64]) -> MetricSeries {
        MetricSeries {
            label: "kubernetes.pod.cpu.usage_rate".into(),
            tags: [("pod_name".to_string(), pod_name.to_string())]
                .into_iter()
                .collect(),
            data: values
                .iter()
                .enumerate()
                .map(|(i, v)| DataPoint::new(i as i64 * 60, *v))
                .collect(),
            ..Default::default()
        }
    }

    fn service(
        result: QueryResult,
        threshold: f64,
        recorder: &RecordingReportClient,
    ) -> CheckService {
        let mut check = CheckConfig::new("kubernetes.pod.cpu.usage_rate", "acmefitness");
        check.pod_name = Some("b".into());
        check.threshold = threshold;

        let_assert!(
            Ok(config) = CheckServiceConfig::new(
                check,
                Box::new(FakeMetricsClient { result }),
                vec![Box::new(recorder.clone())],
            )
        );
        CheckService::new(config)
    }

    fn three_pods() -> QueryResult {
        QueryResult::Chart(ChartResponse {
            timeseries: vec![
                pod_series("a", &[100.0]),
                pod_series("b", &[2.0, 4.0]),
                pod_series("c", &[0.0]),
            ],
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn run_alerts_above_threshold() {
        let recorder = RecordingReportClient::default();

        let_assert!(Ok(evaluation) = service(three_pods(), 2.5, &recorder).run().await);

        check!(evaluation.average == 3.0);
        check!(evaluation.verdict == Verdict::Alert);
        check!(evaluation.message().contains("3.000000"));
        check!(*recorder.reported.lock().unwrap() == vec![Verdict::Alert]);
    }

    #[tokio::test]
    async fn run_passes_below_threshold() {
        let recorder = RecordingReportClient::default();

        let_assert!(Ok(evaluation) = service(three_pods(), 3.5, &recorder).run().await);

        check!(evaluation.verdict == Verdict::Ok);
        check!(*recorder.reported.lock().unwrap() == vec![Verdict::Ok]);
    }

    #[tokio::test]
    async fn run_without_matching_series_reports_nothing() {
        let recorder = RecordingReportClient::default();
        let result = QueryResult::Series(vec![pod_series("a", &[1.0])]);

        let_assert!(
            Err(CheckError::NoMatchingSeries { .. }) = service(result, 1.0, &recorder).run().await
        );
        check!(recorder.reported.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn run_with_empty_series_reports_nothing() {
        let recorder = RecordingReportClient::default();
        let result = QueryResult::Series(vec![pod_series("b", &[])]);

        let_assert!(Err(CheckError::EmptyInput(_)) = service(result, 1.0, &recorder).run().await);
        check!(recorder.reported.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn run_writes_alert_file_on_alert_only() {
        let_assert!(Ok(dir) = tempfile::tempdir());
        let path = dir.path().join("alert");

        for (threshold, expect_file) in [(3.5, false), (2.5, true)] {
            let mut check = CheckConfig::new("kubernetes.pod.cpu.usage_rate", "acmefitness");
            check.pod_name = Some("b".into());
            check.threshold = threshold;
            let_assert!(Ok(alert_file_config) = AlertFileClientConfig::new(&path.to_string_lossy()));
            let_assert!(
                Ok(config) = CheckServiceConfig::new(
                    check,
                    Box::new(FakeMetricsClient { result: three_pods() }),
                    vec![Box::new(AlertFileClient::new(alert_file_config))],
                )
            );

            let_assert!(Ok(_) = CheckService::new(config).run().await);
            check!(path.exists() == expect_file);
        }
    }

    #[tokio::test]
    async fn run_propagates_query_errors() {
        let recorder = RecordingReportClient::default();
        let_assert!(
            Ok(config) = CheckServiceConfig::new(
                CheckConfig::new("m", "c"),
                Box::new(FailingMetricsClient),
                vec![Box::new(recorder.clone())],
            )
        );

        let_assert!(
            Err(CheckError::Api { status: 401, .. }) = CheckService::new(config).run().await
        );
        check!(recorder.reported.lock().unwrap().is_empty());
    }
}
