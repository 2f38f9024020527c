//! Tree operation behaviour switches.

use serde::{Deserialize, Serialize};

use crate::types::ReadScope;

/// Settings for the collection-tree engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Default scope for the "fully read" flag and bulk read-marking.
    #[serde(default)]
    pub read_scope: ReadScope,
    /// Run subtree deletion and ingestion inside a single unit of work.
    ///
    /// When disabled every step commits on its own and a failure part-way
    /// leaves the steps already completed in place.
    #[serde(default = "default_true")]
    pub atomic_operations: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            read_scope: ReadScope::Direct,
            atomic_operations: true,
        }
    }
}

fn default_true() -> bool {
    true
}
