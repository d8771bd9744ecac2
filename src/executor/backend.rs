use async_trait::async_trait;
use crate::error::Result;
use crate::job::{JobRequest, JobSnapshot};
use crate::resource::TableId;

/// The BigQuery calls a [`super::Warehouse`] relies on.
///
/// [`super::BqClient`] is the production implementation; tests plug in an
/// in-memory one.
#[async_trait]
pub trait JobBackend: Send + Sync {
    /// Submits a job and returns the resource as first reported.
    async fn insert_job(&self, request: &JobRequest) -> Result<JobSnapshot>;

    async fn get_job(&self, project_id: &str, job_id: &str, location: Option<&str>) -> Result<JobSnapshot>;

    /// Row count of a finished query job's result table.
    async fn query_total_rows(&self, project_id: &str, job_id: &str, location: Option<&str>) -> Result<Option<u64>>;

    async fn table_exists(&self, table: &TableId) -> Result<bool>;
}
