//! Structure-merge ingestion modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// How a matched collection's existing comics are treated during ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IngestMode {
    /// First upload of a new root collection. Behaves like `Append`.
    Create,
    /// Keep existing comics and add the new ones.
    Append,
    /// Purge the direct comics of every matched collection before inserting.
    Overwrite,
}

impl IngestMode {
    /// Whether matched collections lose their direct comics first.
    pub fn purges_existing(&self) -> bool {
        matches!(self, Self::Overwrite)
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Append => "append",
            Self::Overwrite => "overwrite",
        }
    }
}

impl fmt::Display for IngestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IngestMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "append" => Ok(Self::Append),
            "overwrite" => Ok(Self::Overwrite),
            other => Err(AppError::validation(format!(
                "Invalid ingestion mode '{other}'. Supported: append, overwrite"
            ))),
        }
    }
}

impl TryFrom<String> for IngestMode {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IngestMode> for String {
    fn from(mode: IngestMode) -> Self {
        mode.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_known_modes() {
        assert_eq!("append".parse::<IngestMode>().unwrap(), IngestMode::Append);
        assert_eq!(
            "overwrite".parse::<IngestMode>().unwrap(),
            IngestMode::Overwrite
        );
        assert_eq!("create".parse::<IngestMode>().unwrap(), IngestMode::Create);
    }

    #[test]
    fn test_unknown_mode_is_validation_error() {
        let err = "replace".parse::<IngestMode>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_serde_rejects_unknown_mode() {
        let ok: IngestMode = serde_json::from_str("\"overwrite\"").unwrap();
        assert!(ok.purges_existing());
        assert!(serde_json::from_str::<IngestMode>("\"merge\"").is_err());
    }
}
