use std::fmt;

/// A classified failure reported by the BigQuery API or its auth layer.
#[derive(Debug, Clone)]
pub enum BigQueryError {
    AuthenticationFailed {
        reason: String,
    },

    InvalidCredentials {
        path: Option<String>,
        reason: String,
    },

    InvalidQuery {
        sql_preview: String,
        message: String,
        location: Option<QueryErrorLocation>,
    },

    TableNotFound {
        project: String,
        dataset: String,
        table: String,
    },

    DatasetNotFound {
        project: String,
        dataset: String,
    },

    AccessDenied {
        resource: String,
        required_permission: Option<String>,
    },

    QuotaExceeded {
        message: String,
    },

    ConnectionFailed {
        reason: String,
    },

    Unknown {
        code: Option<String>,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryErrorLocation {
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl BigQueryError {
    pub fn suggestion(&self) -> String {
        match self {
            BigQueryError::AuthenticationFailed { .. } => {
                "Check that the service account key has not been revoked\n\
                 and that the BigQuery API is enabled for its project".to_string()
            }

            BigQueryError::InvalidCredentials { path, .. } => {
                let path_info = path.as_ref()
                    .map(|p| format!(" at {p}"))
                    .unwrap_or_default();
                format!(
                    "The service account secret{path_info} could not be used:\n  \
                     • Verify it is a JSON key of type service_account\n  \
                     • Re-download the key if it was rotated"
                )
            }

            BigQueryError::InvalidQuery { .. } => {
                "Check the SQL for syntax errors and misspelled table or column names".to_string()
            }

            BigQueryError::TableNotFound { project, dataset, table } => {
                format!(
                    "Verify the table exists:\n  \
                     • Run: bq show {project}:{dataset}.{table}\n  \
                     • Tables are provisioned by infrastructure code, not by this tool"
                )
            }

            BigQueryError::DatasetNotFound { project, dataset } => {
                format!("Verify the dataset exists: bq show {project}:{dataset}")
            }

            BigQueryError::AccessDenied { resource, required_permission } => {
                let perm = required_permission.as_deref().unwrap_or("bigquery.jobs.create");
                format!(
                    "Grant the service account access to {resource}:\n  \
                     • Required permission: {perm}"
                )
            }

            BigQueryError::QuotaExceeded { .. } => {
                "Wait and retry later, or request a quota increase".to_string()
            }

            BigQueryError::ConnectionFailed { .. } => {
                "Check network connectivity to bigquery.googleapis.com".to_string()
            }

            BigQueryError::Unknown { .. } => {
                "Check BigQuery status: https://status.cloud.google.com/".to_string()
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            BigQueryError::AuthenticationFailed { .. } => "AUTH_FAILED",
            BigQueryError::InvalidCredentials { .. } => "INVALID_CREDENTIALS",
            BigQueryError::InvalidQuery { .. } => "INVALID_QUERY",
            BigQueryError::TableNotFound { .. } => "TABLE_NOT_FOUND",
            BigQueryError::DatasetNotFound { .. } => "DATASET_NOT_FOUND",
            BigQueryError::AccessDenied { .. } => "ACCESS_DENIED",
            BigQueryError::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            BigQueryError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            BigQueryError::Unknown { .. } => "UNKNOWN",
        }
    }
}

impl fmt::Display for BigQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BigQueryError::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }

            BigQueryError::InvalidCredentials { reason, path } => {
                write!(f, "Invalid credentials: {reason}")?;
                if let Some(p) = path {
                    write!(f, " (path: {p})")?;
                }
                Ok(())
            }

            BigQueryError::InvalidQuery { message, sql_preview, location } => {
                write!(f, "Invalid SQL: {message}")?;
                if let Some(QueryErrorLocation { line: Some(line), column }) = location {
                    write!(f, " (line {line}")?;
                    if let Some(col) = column {
                        write!(f, ", column {col}")?;
                    }
                    write!(f, ")")?;
                }
                if !sql_preview.is_empty() {
                    write!(f, "\n\nSQL preview:\n  {sql_preview}")?;
                }
                Ok(())
            }

            BigQueryError::TableNotFound { project, dataset, table } => {
                write!(f, "Table not found: {project}.{dataset}.{table}")
            }

            BigQueryError::DatasetNotFound { project, dataset } => {
                write!(f, "Dataset not found: {project}.{dataset}")
            }

            BigQueryError::AccessDenied { resource, required_permission } => {
                write!(f, "Access denied to {resource}")?;
                if let Some(perm) = required_permission {
                    write!(f, " (requires {perm})")?;
                }
                Ok(())
            }

            BigQueryError::QuotaExceeded { message } => {
                write!(f, "Quota exceeded: {message}")
            }

            BigQueryError::ConnectionFailed { reason } => {
                write!(f, "Connection failed: {reason}")
            }

            BigQueryError::Unknown { code: Some(c), message } => {
                write!(f, "BigQuery error [{c}]: {message}")
            }

            BigQueryError::Unknown { code: None, message } => {
                write!(f, "BigQuery error: {message}")
            }
        }
    }
}

impl std::error::Error for BigQueryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(BigQueryError::AuthenticationFailed {
            reason: "r".into(),
        }.error_code(), "AUTH_FAILED");

        assert_eq!(BigQueryError::TableNotFound {
            project: "p".into(),
            dataset: "d".into(),
            table: "t".into(),
        }.error_code(), "TABLE_NOT_FOUND");

        assert_eq!(BigQueryError::AccessDenied {
            resource: "r".into(),
            required_permission: None,
        }.error_code(), "ACCESS_DENIED");

        assert_eq!(BigQueryError::Unknown {
            code: None,
            message: "m".into(),
        }.error_code(), "UNKNOWN");
    }

    #[test]
    fn test_display_invalid_query_with_location() {
        let err = BigQueryError::InvalidQuery {
            sql_preview: "SELECT * FROM".into(),
            message: "Syntax error".into(),
            location: Some(QueryErrorLocation { line: Some(1), column: Some(15) }),
        };
        let display = err.to_string();
        assert!(display.contains("Invalid SQL: Syntax error"));
        assert!(display.contains("line 1, column 15"));
        assert!(display.contains("SELECT * FROM"));
    }

    #[test]
    fn test_display_table_not_found() {
        let err = BigQueryError::TableNotFound {
            project: "my-project".into(),
            dataset: "my_dataset".into(),
            table: "my_table".into(),
        };
        assert_eq!(err.to_string(), "Table not found: my-project.my_dataset.my_table");
        assert!(err.suggestion().contains("bq show my-project:my_dataset.my_table"));
    }

    #[test]
    fn test_display_unknown() {
        let with_code = BigQueryError::Unknown {
            code: Some("HTTP_503".into()),
            message: "backend".into(),
        };
        assert_eq!(with_code.to_string(), "BigQuery error [HTTP_503]: backend");

        let without_code = BigQueryError::Unknown {
            code: None,
            message: "backend".into(),
        };
        assert_eq!(without_code.to_string(), "BigQuery error: backend");
    }

    #[test]
    fn test_suggestion_invalid_credentials_with_path() {
        let err = BigQueryError::InvalidCredentials {
            path: Some("/secrets/bq.json".into()),
            reason: "bad key".into(),
        };
        assert!(err.suggestion().contains("/secrets/bq.json"));
        assert!(err.to_string().contains("path: /secrets/bq.json"));
    }
}
