mod id;
mod request;
mod result;
mod snapshot;

pub use id::{new_job_id, JobKind};
pub use request::{ExtractConfig, JobConfig, JobReference, JobRequest, LoadConfig, QueryConfig};
pub use result::{JobResult, JobResults};
pub use snapshot::{ErrorProto, JobSnapshot, JobStatistics, JobStatus, SnapshotReference};
