use crate::error::{BqJobsError, Result};
use super::format::SourceFormat;
use std::fmt;
use std::str::FromStr;

const SCHEME: &str = "gs://";

/// An object in Cloud Storage, `gs://bucket/path/filename`.
///
/// The scheme is optional when parsing; `path` holds the segments between the
/// bucket and the filename joined by `/` and is empty for objects at the
/// bucket root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcsUri {
    pub bucket: String,
    pub path: String,
    pub filename: String,
}

impl GcsUri {
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri.strip_prefix(SCHEME).unwrap_or(uri);
        let mut parts: Vec<&str> = rest.split('/').collect();

        if parts.len() < 2 || parts[0].is_empty() {
            return Err(BqJobsError::InvalidUri(uri.to_string()));
        }

        let bucket = parts.remove(0).to_string();
        let filename = parts.pop().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(BqJobsError::InvalidUri(uri.to_string()));
        }

        Ok(Self {
            bucket,
            path: parts.join("/"),
            filename,
        })
    }

    pub fn extension(&self) -> Option<&str> {
        self.filename.rsplit_once('.').map(|(_, ext)| ext)
    }

    pub fn format(&self) -> SourceFormat {
        SourceFormat::from_extension(self.extension().unwrap_or(""))
    }
}

impl FromStr for GcsUri {
    type Err = BqJobsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for GcsUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{SCHEME}{}/{}", self.bucket, self.filename)
        } else {
            write!(f, "{SCHEME}{}/{}/{}", self.bucket, self.path, self.filename)
        }
    }
}
