use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use super::snapshot::{ErrorProto, JobSnapshot};

/// Result records of one facade operation, keyed by job kind (`queryJob`, `extractJob`, `loadJob`).
pub type JobResults = BTreeMap<String, JobResult>;

/// Uniform record of a finished job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub job_errors: Option<Vec<ErrorProto>>,
    pub total_bytes_billed: Option<i64>,
    pub total_bytes_processed: Option<i64>,
    pub total_rows_returned: Option<u64>,
    pub query_plan: Option<Value>,
    pub job_results: Option<Value>,
}

impl JobResult {
    /// Builds the record from a finished job. `total_rows` comes from the
    /// query-results endpoint for query jobs; load jobs fall back to their
    /// output row count. Byte counters and the plan are query-only.
    pub fn from_snapshot(snapshot: &JobSnapshot, total_rows: Option<u64>) -> Self {
        let stats = snapshot.statistics.as_ref();

        let total_rows_returned = total_rows.or_else(|| {
            stats
                .and_then(|s| s.load_i64("outputRows"))
                .and_then(|n| u64::try_from(n).ok())
        });

        let errors = snapshot.errors();

        Self {
            start_time: stats.and_then(|s| s.start_time).and_then(ctime),
            end_time: stats.and_then(|s| s.end_time).and_then(ctime),
            job_errors: (!errors.is_empty()).then(|| errors.to_vec()),
            total_bytes_billed: stats.and_then(|s| s.query_i64("totalBytesBilled")),
            total_bytes_processed: stats.and_then(|s| s.query_i64("totalBytesProcessed")),
            total_rows_returned,
            query_plan: stats
                .and_then(|s| s.query.as_ref())
                .and_then(|q| q.get("queryPlan"))
                .cloned(),
            job_results: stats.and_then(|s| {
                s.query.clone().or_else(|| s.load.clone()).or_else(|| s.extract.clone())
            }),
        }
    }
}

/// Epoch milliseconds rendered like C's `ctime`, in UTC: `Sat Jun 15 09:00:00 2024`.
fn ctime(millis: i64) -> Option<String> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.format("%a %b %e %H:%M:%S %Y").to_string())
}
