mod bq_error;
mod parser;

use thiserror::Error;

pub use bq_error::{BigQueryError, QueryErrorLocation};
pub use parser::{parse_bq_error, is_not_found, ErrorContext};

#[derive(Error, Debug)]
pub enum BqJobsError {
    #[error("BigQuery error: {0}")]
    BigQuery(#[from] BigQueryError),

    #[error("Create {0} using terraform in Github before running the container")]
    TableMissing(String),

    #[error("Invalid table id '{0}': expected project.dataset.table")]
    InvalidTableId(String),

    #[error("Invalid storage URI '{0}'")]
    InvalidUri(String),

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Job {job_id} failed: {message}")]
    JobFailed {
        job_id: String,
        reason: Option<String>,
        message: String,
        location: Option<String>,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BqJobsError>;
