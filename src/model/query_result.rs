use crate::error::Result;
use crate::model::MetricSeries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response of the Wavefront chart API (`/api/v2/chart/api`).
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct ChartResponse {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub granularity: i64,
    #[serde(default)]
    pub timeseries: Vec<MetricSeries>,
    #[serde(default)]
    pub stats: BTreeMap<String, i64>,
}

/// The two response shapes seen from the backend. Decoding tries the chart
/// object first and falls back to a bare list of series.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(untagged)]
pub enum QueryResult {
    Chart(ChartResponse),
    Series(Vec<MetricSeries>),
}

impl QueryResult {
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    pub fn series(&self) -> &[MetricSeries] {
        match self {
            QueryResult::Chart(chart) => &chart.timeseries,
            QueryResult::Series(series) => series,
        }
    }
}
