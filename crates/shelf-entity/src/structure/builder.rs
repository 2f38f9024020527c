//! Builds a [`StructureNode`] tree from a flat scanned file listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::comic::NewComic;

use super::node::StructureNode;

/// A comic file found by a folder scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedComic {
    /// Display name; the file stem of `path` when empty.
    #[serde(default)]
    pub name: String,
    /// Path relative to the scanned folder's parent, e.g.
    /// `My Comics/DC/Batman/The Batman #1.pdf`.
    pub path: String,
    /// Directory segments of `path`, starting with the scanned folder.
    #[serde(default)]
    pub directories: Vec<String>,
    /// Read flag recorded by the scanner.
    #[serde(default)]
    pub is_read: bool,
    /// Read time recorded by the scanner.
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
}

impl ScannedComic {
    /// A scanned file whose directories are taken from `path`.
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let mut directories: Vec<String> = path
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        directories.pop();
        Self {
            name: String::new(),
            path,
            directories,
            is_read: false,
            read_at: None,
        }
    }

    fn display_name(&self) -> String {
        let trimmed = self.name.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
        let file = self.path.rsplit(['/', '\\']).next().unwrap_or_default();
        match file.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => file.to_string(),
        }
    }

    fn into_new_comic(self) -> NewComic {
        NewComic {
            name: self.display_name(),
            path: self.path,
            directories: self.directories,
            is_read: self.is_read,
            read_at: self.read_at,
            comment: None,
            rating: None,
        }
    }
}

impl StructureNode {
    /// Build a tree rooted at `root_name` from scanned files.
    ///
    /// The first directory segment is the scanned folder itself and is
    /// replaced by `root_name`. Remaining segments become nested child nodes,
    /// reused by exact name among siblings and kept in first-seen order.
    pub fn from_scanned(root_name: impl Into<String>, files: Vec<ScannedComic>) -> Self {
        let mut root = StructureNode::named(root_name);

        for file in files {
            let sub_dirs: Vec<String> = file.directories.iter().skip(1).cloned().collect();

            let mut node = &mut root;
            for dir in &sub_dirs {
                let index = match node.children.iter().position(|child| child.name == *dir) {
                    Some(index) => index,
                    None => {
                        node.children.push(StructureNode::named(dir.clone()));
                        node.children.len() - 1
                    }
                };
                node = &mut node.children[index];
            }
            node.comics.push(file.into_new_comic());
        }

        root
    }
}
