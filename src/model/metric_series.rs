use crate::error::Result;
use crate::model::average;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A single sample. The chart API sends `[timestamp, value]` pairs, the raw
/// API sends `{"timestamp": .., "value": ..}` objects; both decode into this.
#[derive(Copy, Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(from = "RawDataPoint", into = "(i64, f64)")]
pub struct DataPoint {
    pub timestamp: i64,
    pub value: f64,
}

impl DataPoint {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDataPoint {
    Pair(f64, f64),
    Object { timestamp: f64, value: f64 },
}

impl From<RawDataPoint> for DataPoint {
    fn from(raw: RawDataPoint) -> Self {
        match raw {
            RawDataPoint::Pair(timestamp, value) | RawDataPoint::Object { timestamp, value } => {
                DataPoint::new(timestamp as i64, value)
            }
        }
    }
}

impl From<DataPoint> for (i64, f64) {
    fn from(point: DataPoint) -> Self {
        (point.timestamp, point.value)
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct MetricSeries {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub host: String,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: BTreeMap<String, String>,
    #[serde(default, alias = "points")]
    pub data: Vec<DataPoint>,
}

/// Tags sent as `null` are treated as absent.
fn deserialize_tags<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags: Option<BTreeMap<String, Option<String>>> = Option::deserialize(deserializer)?;

    Ok(tags
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect())
}

impl MetricSeries {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().map(|p| p.value)
    }

    /// Mean of all sample values, see [`average`].
    pub fn average(&self) -> Result<f64> {
        average(&self.label, self.values())
    }
}
