use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const SUFFIX_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobKind {
    #[serde(rename = "queryJob")]
    Query,
    #[serde(rename = "extractJob")]
    Extract,
    #[serde(rename = "loadJob")]
    Load,
    #[serde(rename = "copyJob")]
    Copy,
}

impl JobKind {
    /// Name used in job ids and as the key of a [`super::JobResults`] entry.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Query => "queryJob",
            JobKind::Extract => "extractJob",
            JobKind::Load => "loadJob",
            JobKind::Copy => "copyJob",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{project}-{kind}-{YYYY-MM-DD-HH-MM-SS}-{suffix}` with a random alphanumeric suffix.
pub fn new_job_id(project_id: &str, kind: JobKind, now: DateTime<Utc>) -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(SUFFIX_LEN).collect();
    format!(
        "{}-{}-{}-{}",
        project_id,
        kind,
        now.format("%Y-%m-%d-%H-%M-%S"),
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_job_id_layout() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 9, 5, 3).unwrap();
        let id = new_job_id("acme", JobKind::Extract, now);

        let prefix = "acme-extractJob-2024-06-15-09-05-03-";
        assert!(id.starts_with(prefix), "{}", id);
        let suffix = &id[prefix.len()..];
        assert_eq!(suffix.len(), 10);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_job_ids_are_unique() {
        let now = Utc::now();
        assert_ne!(new_job_id("p", JobKind::Query, now), new_job_id("p", JobKind::Query, now));
    }
}
