use async_trait::async_trait;
use gcp_bigquery_client::Client;
use gcp_bigquery_client::model::get_query_results_parameters::GetQueryResultsParameters;
use gcp_bigquery_client::model::job::Job;
use serde_json::{json, Value};
use std::path::Path;
use crate::error::{BqJobsError, Result, parse_bq_error, is_not_found, ErrorContext};
use crate::job::{JobRequest, JobSnapshot};
use crate::resource::TableId;
use super::backend::JobBackend;

/// [`JobBackend`] over the BigQuery REST API.
#[derive(Clone)]
pub struct BqClient {
    client: Client,
}

impl BqClient {
    pub async fn from_key_file(path: &Path) -> Result<Self> {
        let path_str = path.to_string_lossy();
        let client = Client::from_service_account_key_file(&path_str)
            .await
            .map_err(|e| {
                let ctx = ErrorContext::new().with_key_path(path_str.to_string());
                BqJobsError::BigQuery(parse_bq_error(e, ctx))
            })?;

        Ok(Self { client })
    }
}

fn to_sdk_job(request: &JobRequest) -> Result<Job> {
    Ok(serde_json::from_value(serde_json::to_value(request)?)?)
}

fn to_snapshot(job: &Job) -> Result<JobSnapshot> {
    Ok(serde_json::from_value(serde_json::to_value(job)?)?)
}

#[async_trait]
impl JobBackend for BqClient {
    async fn insert_job(&self, request: &JobRequest) -> Result<JobSnapshot> {
        let job = to_sdk_job(request)?;

        let inserted = self.client
            .job()
            .insert(request.project_id(), job)
            .await
            .map_err(|e| {
                let mut ctx = ErrorContext::new();
                if let Some(query) = &request.configuration.query {
                    ctx = ctx.with_sql(&query.query);
                }
                BqJobsError::BigQuery(parse_bq_error(e, ctx))
            })?;

        to_snapshot(&inserted)
    }

    async fn get_job(&self, project_id: &str, job_id: &str, location: Option<&str>) -> Result<JobSnapshot> {
        let job = self.client
            .job()
            .get_job(project_id, job_id, location)
            .await
            .map_err(|e| {
                BqJobsError::BigQuery(parse_bq_error(e, ErrorContext::new()))
            })?;

        to_snapshot(&job)
    }

    async fn query_total_rows(&self, project_id: &str, job_id: &str, location: Option<&str>) -> Result<Option<u64>> {
        // maxResults 0: metadata only, no rows
        let params: GetQueryResultsParameters = serde_json::from_value(json!({
            "location": location,
            "maxResults": 0,
        }))?;

        let response = self.client
            .job()
            .get_query_results(project_id, job_id, params)
            .await
            .map_err(|e| {
                BqJobsError::BigQuery(parse_bq_error(e, ErrorContext::new()))
            })?;

        let total_rows = serde_json::to_value(&response)?
            .get("totalRows")
            .and_then(|v| match v {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            });

        Ok(total_rows)
    }

    async fn table_exists(&self, table: &TableId) -> Result<bool> {
        match self.client
            .table()
            .get(&table.project_id, &table.dataset_id, &table.table_id, None)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => {
                let ctx = ErrorContext::new()
                    .with_table(&table.project_id, &table.dataset_id, &table.table_id);
                Err(BqJobsError::BigQuery(parse_bq_error(e, ctx)))
            }
        }
    }
}
