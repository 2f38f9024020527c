//! How far read-status aggregation and bulk read-marking reach.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Scope of the "fully read" aggregation and of bulk read-marking.
///
/// `Direct` only looks at comics owned by the named collection itself.
/// `Recursive` looks at every comic in the collection's subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadScope {
    /// Direct comics of the collection only.
    #[default]
    Direct,
    /// All comics in the collection's subtree.
    Recursive,
}

impl ReadScope {
    /// Returns the scope for a `recursive` flag.
    pub fn from_recursive(recursive: bool) -> Self {
        if recursive { Self::Recursive } else { Self::Direct }
    }

    /// Whether the scope descends into child collections.
    pub fn is_recursive(&self) -> bool {
        matches!(self, Self::Recursive)
    }
}

impl fmt::Display for ReadScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Recursive => write!(f, "recursive"),
        }
    }
}

impl FromStr for ReadScope {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "recursive" => Ok(Self::Recursive),
            other => Err(AppError::validation(format!(
                "Invalid read scope '{other}'. Supported: direct, recursive"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scope() {
        assert_eq!("direct".parse::<ReadScope>().unwrap(), ReadScope::Direct);
        assert_eq!(
            " Recursive ".parse::<ReadScope>().unwrap(),
            ReadScope::Recursive
        );
        assert!("deep".parse::<ReadScope>().is_err());
    }

    #[test]
    fn test_default_is_direct() {
        assert_eq!(ReadScope::default(), ReadScope::Direct);
        assert!(ReadScope::from_recursive(true).is_recursive());
    }
}
