mod check_config;
mod evaluation;
mod gitlab_variable;
mod granularity;
mod metric_series;
mod query_result;
mod series_selector;

pub use crate::model::check_config::{
    CheckConfig, SeriesSelection, DEFAULT_ALERT_FILE, DEFAULT_THRESHOLD,
    DEFAULT_TIME_WINDOW_SECONDS,
};
pub use crate::model::evaluation::{average, classify, Evaluation, Verdict};
pub use crate::model::gitlab_variable::GitlabVariable;
pub use crate::model::granularity::Granularity;
pub use crate::model::metric_series::{DataPoint, MetricSeries};
pub use crate::model::query_result::{ChartResponse, QueryResult};
pub use crate::model::series_selector::SeriesSelector;
