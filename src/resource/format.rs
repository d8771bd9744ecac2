use serde::{Deserialize, Serialize};
use std::fmt;

/// Serialization format of a file in object storage, named as the jobs API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceFormat {
    #[default]
    Csv,
    NewlineDelimitedJson,
    Parquet,
    Avro,
}

impl SourceFormat {
    /// Picks the format for a file extension, ignoring case. Unrecognized
    /// extensions are CSV.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "parquet" => SourceFormat::Parquet,
            "json" => SourceFormat::NewlineDelimitedJson,
            "avro" => SourceFormat::Avro,
            _ => SourceFormat::Csv,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "CSV",
            SourceFormat::NewlineDelimitedJson => "NEWLINE_DELIMITED_JSON",
            SourceFormat::Parquet => "PARQUET",
            SourceFormat::Avro => "AVRO",
        }
    }

    pub fn is_csv(&self) -> bool {
        matches!(self, SourceFormat::Csv)
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WriteDisposition {
    #[default]
    WriteAppend,
}

impl WriteDisposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteDisposition::WriteAppend => "WRITE_APPEND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_extensions() {
        assert_eq!(SourceFormat::from_extension("parquet"), SourceFormat::Parquet);
        assert_eq!(SourceFormat::from_extension("json"), SourceFormat::NewlineDelimitedJson);
        assert_eq!(SourceFormat::from_extension("avro"), SourceFormat::Avro);
        assert_eq!(SourceFormat::from_extension("csv"), SourceFormat::Csv);
    }

    #[test]
    fn test_unknown_extension_is_csv() {
        assert_eq!(SourceFormat::from_extension("tsv"), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_extension(""), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_extension("PAR"), SourceFormat::Csv);
    }

    #[test]
    fn test_extension_case_insensitive() {
        assert_eq!(SourceFormat::from_extension("PARQUET"), SourceFormat::Parquet);
        assert_eq!(SourceFormat::from_extension("Json"), SourceFormat::NewlineDelimitedJson);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&SourceFormat::NewlineDelimitedJson).unwrap();
        assert_eq!(json, "\"NEWLINE_DELIMITED_JSON\"");
        assert_eq!(WriteDisposition::default().as_str(), "WRITE_APPEND");
    }
}
