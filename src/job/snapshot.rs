use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use crate::resource::TableId;

const STATE_DONE: &str = "DONE";

/// The parts of a job resource read back after `jobs.insert` / `jobs.get`.
///
/// int64 fields arrive as JSON strings from the REST API; both strings and
/// numbers are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshot {
    #[serde(default)]
    pub job_reference: Option<SnapshotReference>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub statistics: Option<JobStatistics>,
    #[serde(default)]
    pub configuration: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotReference {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error_result: Option<ErrorProto>,
    #[serde(default)]
    pub errors: Option<Vec<ErrorProto>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorProto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatistics {
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub start_time: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub query: Option<Value>,
    #[serde(default)]
    pub load: Option<Value>,
    #[serde(default)]
    pub extract: Option<Value>,
}

impl JobSnapshot {
    pub fn is_done(&self) -> bool {
        self.status
            .as_ref()
            .and_then(|s| s.state.as_deref())
            .is_some_and(|state| state == STATE_DONE)
    }

    pub fn state(&self) -> Option<&str> {
        self.status.as_ref().and_then(|s| s.state.as_deref())
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_reference.as_ref().and_then(|r| r.job_id.as_deref())
    }

    pub fn location(&self) -> Option<&str> {
        self.job_reference.as_ref().and_then(|r| r.location.as_deref())
    }

    /// The fatal error of a finished job, if it failed.
    pub fn error_result(&self) -> Option<&ErrorProto> {
        self.status.as_ref().and_then(|s| s.error_result.as_ref())
    }

    /// All errors encountered, including non-fatal ones on successful jobs.
    pub fn errors(&self) -> &[ErrorProto] {
        self.status
            .as_ref()
            .and_then(|s| s.errors.as_deref())
            .unwrap_or(&[])
    }

    /// Table holding a query job's results (an anonymous table unless one was requested).
    pub fn query_destination(&self) -> Option<TableId> {
        let table = self.configuration.as_ref()?.get("query")?.get("destinationTable")?;
        serde_json::from_value(table.clone()).ok()
    }
}

impl JobStatistics {
    pub fn query_i64(&self, field: &str) -> Option<i64> {
        self.query.as_ref().and_then(|q| value_as_i64(q.get(field)?))
    }

    pub fn load_i64(&self, field: &str) -> Option<i64> {
        self.load.as_ref().and_then(|l| value_as_i64(l.get(field)?))
    }
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn de_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_i64))
}
