use serde::{Deserialize, Serialize};
use crate::resource::{SourceFormat, TableId, WriteDisposition};
use super::id::JobKind;

/// Body of a `jobs.insert` call, in the REST field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    pub job_reference: JobReference,
    pub configuration: JobConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReference {
    pub project_id: String,
    pub job_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract: Option<ExtractConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<LoadConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryConfig {
    pub query: String,
    pub use_legacy_sql: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractConfig {
    pub source_table: TableId,
    pub destination_uris: Vec<String>,
    pub destination_format: SourceFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_delimiter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadConfig {
    pub source_uris: Vec<String>,
    pub destination_table: TableId,
    pub source_format: SourceFormat,
    pub autodetect: bool,
    pub write_disposition: WriteDisposition,
}

impl JobRequest {
    pub fn query(job_reference: JobReference, sql: impl Into<String>) -> Self {
        Self {
            job_reference,
            configuration: JobConfig {
                query: Some(QueryConfig {
                    query: sql.into(),
                    use_legacy_sql: false,
                }),
                ..Default::default()
            },
        }
    }

    /// Export `source_table` to `destination_uri`. The delimiter only applies to CSV output.
    pub fn extract(
        job_reference: JobReference,
        source_table: TableId,
        destination_uri: impl Into<String>,
        format: SourceFormat,
        delimiter: &str,
    ) -> Self {
        let field_delimiter = format.is_csv().then(|| delimiter.to_string());
        Self {
            job_reference,
            configuration: JobConfig {
                extract: Some(ExtractConfig {
                    source_table,
                    destination_uris: vec![destination_uri.into()],
                    destination_format: format,
                    field_delimiter,
                }),
                ..Default::default()
            },
        }
    }

    /// Append `source_uri` into `destination_table`, letting the service detect the schema.
    pub fn load(
        job_reference: JobReference,
        source_uri: impl Into<String>,
        destination_table: TableId,
        format: SourceFormat,
    ) -> Self {
        Self {
            job_reference,
            configuration: JobConfig {
                load: Some(LoadConfig {
                    source_uris: vec![source_uri.into()],
                    destination_table,
                    source_format: format,
                    autodetect: true,
                    write_disposition: WriteDisposition::WriteAppend,
                }),
                ..Default::default()
            },
        }
    }

    pub fn kind(&self) -> Option<JobKind> {
        let config = &self.configuration;
        if config.query.is_some() {
            Some(JobKind::Query)
        } else if config.extract.is_some() {
            Some(JobKind::Extract)
        } else if config.load.is_some() {
            Some(JobKind::Load)
        } else {
            None
        }
    }

    pub fn project_id(&self) -> &str {
        &self.job_reference.project_id
    }

    pub fn job_id(&self) -> &str {
        &self.job_reference.job_id
    }

    pub fn location(&self) -> Option<&str> {
        self.job_reference.location.as_deref()
    }
}
