use chrono::Utc;
use tracing::{debug, error, info};
use crate::config::WarehouseConfig;
use crate::credentials::ServiceAccountKey;
use crate::error::{BqJobsError, Result};
use crate::job::{new_job_id, JobKind, JobReference, JobRequest, JobResult, JobResults, JobSnapshot};
use crate::resource::{GcsUri, TableId};
use super::backend::JobBackend;
use super::client::BqClient;

/// Runs query, extract and load jobs and reports each as a [`JobResult`].
///
/// Every operation submits its jobs one at a time and waits for each to
/// finish before moving on.
pub struct Warehouse<B = BqClient> {
    backend: B,
    service_account_email: String,
    config: WarehouseConfig,
}

impl Warehouse<BqClient> {
    /// Stages the service-account key at `config.local_key_file` and builds
    /// a BigQuery client from the staged copy.
    pub async fn connect(config: WarehouseConfig) -> Result<Self> {
        config.validate()?;

        let key = ServiceAccountKey::stage(&config.secret_path, &config.local_key_file)?;
        let client = BqClient::from_key_file(&config.local_key_file).await?;
        info!("Connected to BigQuery as {}", key.client_email);

        Ok(Self::with_backend(client, key.client_email, config))
    }
}

impl<B: JobBackend> Warehouse<B> {
    pub fn with_backend(backend: B, service_account_email: impl Into<String>, config: WarehouseConfig) -> Self {
        Self {
            backend,
            service_account_email: service_account_email.into(),
            config,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs `query`, then exports its result table to `output_uri`.
    ///
    /// The export format follows the URI's extension; CSV output uses
    /// `delimiter`. Returns the `queryJob` and `extractJob` records.
    pub async fn export_query_to_storage(
        &self,
        query: &str,
        project_id: &str,
        output_uri: &str,
        delimiter: &str,
    ) -> Result<JobResults> {
        let destination = GcsUri::parse(output_uri)?;
        let mut results = JobResults::new();

        let query_request = JobRequest::query(self.job_reference(project_id, JobKind::Query), query);
        let (query_result, query_job) = self.run(query_request).await?;
        results.insert(JobKind::Query.to_string(), query_result);

        let source_table = query_job.query_destination().ok_or_else(|| BqJobsError::JobFailed {
            job_id: query_job.job_id().unwrap_or_default().to_string(),
            reason: None,
            message: "query job reported no destination table".to_string(),
            location: None,
        })?;

        let format = destination.format();
        debug!("Exporting {} to {} as {}", source_table, output_uri, format);

        let extract_request = JobRequest::extract(
            self.job_reference(project_id, JobKind::Extract),
            source_table,
            output_uri,
            format,
            delimiter,
        );
        let (extract_result, _) = self.run(extract_request).await?;
        results.insert(JobKind::Extract.to_string(), extract_result);

        Ok(results)
    }

    /// Appends the file at `input_uri` to the existing table `table_id`
    /// (`project.dataset.table`). The table must already exist; nothing is
    /// submitted otherwise.
    pub async fn load_storage_to_table(&self, table_id: &str, input_uri: &str) -> Result<JobResults> {
        let table = TableId::parse(table_id)?;

        if !self.backend.table_exists(&table).await? {
            error!("Destination table {} does not exist", table);
            return Err(BqJobsError::TableMissing(table_id.to_string()));
        }

        let source = GcsUri::parse(input_uri)?;
        let load_request = JobRequest::load(
            self.job_reference(&table.project_id, JobKind::Load),
            input_uri,
            table,
            source.format(),
        );

        let (load_result, _) = self.run(load_request).await?;

        let mut results = JobResults::new();
        results.insert(JobKind::Load.to_string(), load_result);
        Ok(results)
    }

    /// Table-to-table copy has no defined behavior yet, so no job is submitted.
    pub async fn copy_table(&self, destination_table: &str, source_tables: &[&str]) -> Result<JobResults> {
        debug!("copy_table requested: {:?} -> {}", source_tables, destination_table);
        Err(BqJobsError::Unsupported(format!(
            "copying into {} is not implemented",
            destination_table
        )))
    }

    fn job_reference(&self, project_id: &str, kind: JobKind) -> JobReference {
        JobReference {
            project_id: project_id.to_string(),
            job_id: new_job_id(project_id, kind, Utc::now()),
            location: self.config.location.clone(),
        }
    }

    /// Submits `request`, waits for it and builds its record. Failures are
    /// logged with the service account and returned as-is.
    async fn run(&self, request: JobRequest) -> Result<(JobResult, JobSnapshot)> {
        info!("Submitting {} {}", request.kind().map(|k| k.as_str()).unwrap_or("job"), request.job_id());

        match self.submit_and_wait(&request).await {
            Ok(done) => Ok(done),
            Err(e) => {
                error!(
                    "Error: {}\n\nBQ Service Account: {}\n",
                    e, self.service_account_email
                );
                Err(e)
            }
        }
    }

    async fn submit_and_wait(&self, request: &JobRequest) -> Result<(JobResult, JobSnapshot)> {
        let project_id = request.project_id();
        let mut snapshot = self.backend.insert_job(request).await?;

        // the service may assign a different location than requested
        let location = snapshot
            .location()
            .map(str::to_string)
            .or_else(|| request.location().map(str::to_string));

        while !snapshot.is_done() {
            debug!("Job {} is {}", request.job_id(), snapshot.state().unwrap_or("PENDING"));
            tokio::time::sleep(self.config.poll_interval()).await;
            snapshot = self.backend
                .get_job(project_id, request.job_id(), location.as_deref())
                .await?;
        }

        if let Some(failure) = snapshot.error_result() {
            return Err(BqJobsError::JobFailed {
                job_id: request.job_id().to_string(),
                reason: failure.reason.clone(),
                message: failure.message.clone().unwrap_or_else(|| "unknown error".to_string()),
                location: failure.location.clone(),
            });
        }

        let total_rows = match request.kind() {
            Some(JobKind::Query) => {
                self.backend
                    .query_total_rows(project_id, request.job_id(), location.as_deref())
                    .await?
            }
            _ => None,
        };

        let result = JobResult::from_snapshot(&snapshot, total_rows);
        info!("{}", serde_json::to_string(&result)?);

        Ok((result, snapshot))
    }
}
