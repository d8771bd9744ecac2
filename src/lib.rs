pub mod config;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod job;
pub mod resource;

pub use config::WarehouseConfig;
pub use credentials::ServiceAccountKey;
pub use error::{BqJobsError, BigQueryError, Result};
pub use executor::{BqClient, JobBackend, Warehouse};
pub use job::{JobKind, JobRequest, JobResult, JobResults, JobSnapshot};
pub use resource::{GcsUri, SourceFormat, TableId, WriteDisposition};
