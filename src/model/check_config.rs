use crate::config_client::SetDefaults;
use crate::error::{CheckError, Result};
use crate::model::{Granularity, SeriesSelector};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_THRESHOLD: f64 = 1.0;
pub const DEFAULT_TIME_WINDOW_SECONDS: u64 = 30;
pub const DEFAULT_ALERT_FILE: &str = "alert";

#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeriesSelection {
    /// Match the series on the configured pod name or cpu tag.
    #[default]
    Tag,
    /// Always use the first series returned.
    First,
}

/// What to query, how to pick the series and when to alert.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckConfig {
    pub metric: String,
    pub cluster: String,
    #[serde(default)]
    pub pod_name: Option<String>,
    #[serde(default)]
    pub cpu: Option<String>,
    #[serde(default)]
    pub series_selection: SeriesSelection,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_time_window_seconds")]
    pub time_window_seconds: u64,
    #[serde(default)]
    pub granularity: Option<Granularity>,
    #[serde(default = "default_alert_file")]
    pub alert_file: String,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_time_window_seconds() -> u64 {
    DEFAULT_TIME_WINDOW_SECONDS
}

fn default_alert_file() -> String {
    DEFAULT_ALERT_FILE.to_string()
}

impl CheckConfig {
    pub fn new(metric: &str, cluster: &str) -> Self {
        Self {
            metric: metric.to_string(),
            cluster: cluster.to_string(),
            pod_name: None,
            cpu: None,
            series_selection: SeriesSelection::default(),
            threshold: DEFAULT_THRESHOLD,
            time_window_seconds: DEFAULT_TIME_WINDOW_SECONDS,
            granularity: None,
            alert_file: default_alert_file(),
        }
    }

    /// The tag the query is narrowed on, pod name taking precedence over cpu.
    pub fn filter_tag(&self) -> Option<(&'static str, &str)> {
        match (&self.pod_name, &self.cpu) {
            (Some(pod_name), _) => Some(("pod_name", pod_name.as_str())),
            (None, Some(cpu)) => Some(("cpu", cpu.as_str())),
            (None, None) => None,
        }
    }

    /// Wavefront `ts()` expression, e.g.
    /// `ts("kubernetes.pod.cpu.usage_rate", cluster="acme" and pod_name="cart-1")`.
    pub fn query_expression(&self) -> String {
        match self.filter_tag() {
            Some((key, value)) => format!(
                "ts(\"{}\", cluster=\"{}\" and {}=\"{}\")",
                self.metric, self.cluster, key, value
            ),
            None => format!("ts(\"{}\", cluster=\"{}\")", self.metric, self.cluster),
        }
    }

    pub fn selector(&self) -> SeriesSelector {
        match (self.series_selection, self.filter_tag()) {
            (SeriesSelection::Tag, Some((key, value))) => SeriesSelector::tag_equals(key, value),
            _ => SeriesSelector::First,
        }
    }

    /// Start of the query window, `now` minus the configured window.
    pub fn window_start(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        i64::try_from(self.time_window_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or_else(|| CheckError::ConfigInvalid {
                name: "TIME_WINDOW".to_string(),
                value: self.time_window_seconds.to_string(),
                reason: "window reaches outside the representable time range".to_string(),
            })
    }

    /// Rejects values that would make the check meaningless: a threshold
    /// that is NaN or infinite, or a window that cannot be subtracted from now.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(CheckError::ConfigInvalid {
                name: "THRESHOLD".to_string(),
                value: self.threshold.to_string(),
                reason: "threshold must be a finite number".to_string(),
            });
        }

        self.window_start(Utc::now())?;

        Ok(())
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
            .unwrap_or_else(|| Granularity::for_window(self.time_window_seconds))
    }
}

impl SetDefaults for CheckConfig {
    fn set_defaults(&mut self) {
        if self.granularity.is_none() {
            self.granularity = Some(Granularity::for_window(self.time_window_seconds));
        }
        if self.alert_file.is_empty() {
            self.alert_file = default_alert_file();
        }
    }
}
