use crate::error::Result;
use crate::model::{CheckConfig, QueryResult};
use async_trait::async_trait;

#[async_trait]
pub trait MetricsClient: Send + Sync {
    async fn query(&self, check: &CheckConfig) -> Result<QueryResult>;
}
