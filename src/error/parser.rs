use gcp_bigquery_client::error::{BQError, ResponseError};
use super::bq_error::{BigQueryError, QueryErrorLocation};
use regex::Regex;

pub fn parse_bq_error(error: BQError, context: ErrorContext) -> BigQueryError {
    match &error {
        BQError::ResponseError { error: resp } => parse_response_error(resp, context),

        BQError::RequestError(req_err) => BigQueryError::ConnectionFailed {
            reason: req_err.to_string(),
        },

        BQError::NoToken => BigQueryError::AuthenticationFailed {
            reason: "No authentication token available".to_string(),
        },

        BQError::AuthError(auth_err) => BigQueryError::AuthenticationFailed {
            reason: format!("{:?}", auth_err),
        },

        BQError::YupAuthError(yup_err) => BigQueryError::AuthenticationFailed {
            reason: yup_err.to_string(),
        },

        BQError::InvalidServiceAccountKey(io_err)
        | BQError::InvalidServiceAccountAuthenticator(io_err) => BigQueryError::InvalidCredentials {
            path: context.key_path,
            reason: io_err.to_string(),
        },

        _ => BigQueryError::Unknown {
            code: None,
            message: error.to_string(),
        },
    }
}

/// True when the API answered 404 for the requested resource.
pub fn is_not_found(error: &BQError) -> bool {
    matches!(error, BQError::ResponseError { error } if error.error.code == 404)
}

fn parse_response_error(resp: &ResponseError, context: ErrorContext) -> BigQueryError {
    let status = resp.error.code;
    let message = &resp.error.message;
    let reason = resp.error.errors.first().and_then(|e| e.get("reason").map(|s| s.as_str()));

    match (status, reason) {
        (400, Some("invalidQuery")) => BigQueryError::InvalidQuery {
            sql_preview: context.sql.unwrap_or_default(),
            message: message.clone(),
            location: extract_query_location(message),
        },

        (403, Some("accessDenied")) => BigQueryError::AccessDenied {
            resource: context.resource.unwrap_or_else(|| "resource".to_string()),
            required_permission: extract_required_permission(message),
        },

        (403, Some("quotaExceeded")) | (403, Some("rateLimitExceeded")) => {
            BigQueryError::QuotaExceeded { message: message.clone() }
        }

        (404, _) => parse_not_found_error(message, &context),

        (500..=599, _) => BigQueryError::Unknown {
            code: Some(format!("HTTP_{}", status)),
            message: format!("BigQuery server error: {}", message),
        },

        _ => BigQueryError::Unknown {
            code: reason.map(|s| s.to_string()),
            message: message.clone(),
        },
    }
}

fn parse_not_found_error(message: &str, context: &ErrorContext) -> BigQueryError {
    // "Not found: Table project:dataset.table"
    if let Some(caps) = Regex::new(r"(?i)table\s+([^:\s]+):([^.\s]+)\.(\S+)")
        .ok()
        .and_then(|re| re.captures(message))
    {
        return BigQueryError::TableNotFound {
            project: caps[1].to_string(),
            dataset: caps[2].to_string(),
            table: caps[3].to_string(),
        };
    }

    if let (Some(project), Some(dataset), Some(table)) =
        (&context.project, &context.dataset, &context.table)
    {
        return BigQueryError::TableNotFound {
            project: project.clone(),
            dataset: dataset.clone(),
            table: table.clone(),
        };
    }

    if let Some(caps) = Regex::new(r"(?i)dataset\s+([^:\s]+):(\S+)")
        .ok()
        .and_then(|re| re.captures(message))
    {
        return BigQueryError::DatasetNotFound {
            project: caps[1].to_string(),
            dataset: caps[2].to_string(),
        };
    }

    BigQueryError::Unknown {
        code: Some("notFound".to_string()),
        message: message.to_string(),
    }
}

fn extract_query_location(message: &str) -> Option<QueryErrorLocation> {
    // "... at [3:15]"
    let re = Regex::new(r"\[(\d+):(\d+)\]").ok()?;
    let caps = re.captures(message)?;
    Some(QueryErrorLocation {
        line: caps[1].parse().ok(),
        column: caps[2].parse().ok(),
    })
}

fn extract_required_permission(message: &str) -> Option<String> {
    let re = Regex::new(r"(bigquery\.[a-zA-Z.]+[a-zA-Z])").ok()?;
    re.captures(message).map(|caps| caps[1].to_string())
}

#[derive(Debug, Default, Clone)]
pub struct ErrorContext {
    pub sql: Option<String>,
    pub resource: Option<String>,
    pub project: Option<String>,
    pub dataset: Option<String>,
    pub table: Option<String>,
    pub key_path: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        let full_sql = sql.into();
        // keep a short preview
        self.sql = Some(match full_sql.char_indices().nth(500) {
            Some((idx, _)) => format!("{}...", &full_sql[..idx]),
            None => full_sql,
        });
        self
    }

    pub fn with_table(mut self, project: impl Into<String>, dataset: impl Into<String>, table: impl Into<String>) -> Self {
        let (project, dataset, table) = (project.into(), dataset.into(), table.into());
        self.resource = Some(format!("{}.{}.{}", project, dataset, table));
        self.project = Some(project);
        self.dataset = Some(dataset);
        self.table = Some(table);
        self
    }

    pub fn with_key_path(mut self, path: impl Into<String>) -> Self {
        self.key_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_query_location_brackets() {
        let loc = extract_query_location("Syntax error: Unexpected identifier at [3:15]").unwrap();
        assert_eq!(loc.line, Some(3));
        assert_eq!(loc.column, Some(15));
    }

    #[test]
    fn test_extract_query_location_no_match() {
        assert!(extract_query_location("Some error without location info").is_none());
    }

    #[test]
    fn test_extract_required_permission() {
        let msg = "Access Denied: User does not have bigquery.jobs.create permission";
        assert_eq!(extract_required_permission(msg).unwrap(), "bigquery.jobs.create");
        assert!(extract_required_permission("Access denied").is_none());
    }

    #[test]
    fn test_error_context_with_table() {
        let ctx = ErrorContext::new().with_table("my-project", "my_dataset", "my_table");
        assert_eq!(ctx.resource.as_deref(), Some("my-project.my_dataset.my_table"));
        assert_eq!(ctx.table.as_deref(), Some("my_table"));
    }

    #[test]
    fn test_error_context_truncates_long_sql() {
        let sql = "x".repeat(800);
        let ctx = ErrorContext::new().with_sql(sql);
        let preview = ctx.sql.unwrap();
        assert_eq!(preview.len(), 503);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_parse_not_found_table_from_message() {
        let err = parse_not_found_error("Not found: Table my-project:my_dataset.my_table", &ErrorContext::new());
        match err {
            BigQueryError::TableNotFound { project, dataset, table } => {
                assert_eq!(project, "my-project");
                assert_eq!(dataset, "my_dataset");
                assert_eq!(table, "my_table");
            }
            other => panic!("Expected TableNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_not_found_dataset_from_message() {
        let err = parse_not_found_error("Not found: Dataset my-project:my_dataset", &ErrorContext::new());
        assert!(matches!(err, BigQueryError::DatasetNotFound { ref dataset, .. } if dataset == "my_dataset"));
    }

    #[test]
    fn test_parse_not_found_table_from_context() {
        let ctx = ErrorContext::new().with_table("p", "d", "t");
        let err = parse_not_found_error("Not found", &ctx);
        assert_eq!(err.error_code(), "TABLE_NOT_FOUND");
    }

    #[test]
    fn test_parse_not_found_generic() {
        let err = parse_not_found_error("Resource unavailable", &ErrorContext::new());
        assert!(matches!(err, BigQueryError::Unknown { code: Some(ref c), .. } if c == "notFound"));
    }
}
