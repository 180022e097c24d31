use crate::error::Result;
use crate::model::Evaluation;
use async_trait::async_trait;

/// A sink that records the outcome of a check somewhere outside the process.
#[async_trait]
pub trait ReportClient: Send + Sync {
    async fn report(&self, evaluation: &Evaluation) -> Result<()>;
}
