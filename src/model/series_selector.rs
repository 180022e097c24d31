use crate::error::{CheckError, Result};
use crate::model::{MetricSeries, QueryResult};

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SeriesSelector {
    /// Take the first series as returned by the backend.
    First,
    /// Take the first series whose tag `key` equals `value`.
    TagEquals { key: String, value: String },
}

impl SeriesSelector {
    pub fn tag_equals(key: &str, value: &str) -> Self {
        SeriesSelector::TagEquals {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn select<'a>(&self, result: &'a QueryResult) -> Result<&'a MetricSeries> {
        let series = result.series();
        if series.is_empty() {
            return Err(CheckError::EmptyResult);
        }

        match self {
            SeriesSelector::First => Ok(&series[0]),
            SeriesSelector::TagEquals { key, value } => series
                .iter()
                .find(|s| s.tag(key) == Some(value.as_str()))
                .ok_or_else(|| CheckError::NoMatchingSeries {
                    key: key.clone(),
                    value: value.clone(),
                }),
        }
    }
}
