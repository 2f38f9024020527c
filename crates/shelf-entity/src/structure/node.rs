//! Structure tree description.

use serde::{Deserialize, Serialize};

use shelf_core::error::AppError;
use shelf_core::result::AppResult;

use crate::comic::NewComic;

/// One node of a nested collection description: a collection name, the
/// comics it holds, and its child nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureNode {
    /// Collection name, matched exactly against existing siblings.
    pub name: String,
    /// Comics directly owned by this node.
    #[serde(default)]
    pub comics: Vec<NewComic>,
    /// Child nodes.
    #[serde(default, alias = "subcollections")]
    pub children: Vec<StructureNode>,
}

impl StructureNode {
    /// An empty node.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comics: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style helper adding a comic.
    pub fn with_comic(mut self, comic: NewComic) -> Self {
        self.comics.push(comic);
        self
    }

    /// Builder-style helper adding a child node.
    pub fn with_child(mut self, child: StructureNode) -> Self {
        self.children.push(child);
        self
    }

    /// Check every node name and comic in the tree.
    pub fn validate(&self) -> AppResult<()> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.name.trim().is_empty() {
                return Err(AppError::validation(
                    "Structure node name cannot be empty",
                ));
            }
            for comic in &node.comics {
                comic.validate()?;
            }
            stack.extend(node.children.iter());
        }
        Ok(())
    }

    /// Number of nodes in the tree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Number of comics in the tree.
    pub fn comic_count(&self) -> usize {
        self.comics.len() + self.children.iter().map(Self::comic_count).sum::<usize>()
    }
}
