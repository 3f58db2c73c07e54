//! Declarative level sources: the nested record format and its file loader.

use super::{Level, LevelId, LevelTree};
use crate::error::{AllocError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// One node of a declarative level source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    #[serde(alias = "tag")]
    pub label: String,
    #[serde(default)]
    pub leaf: bool,
    #[serde(default)]
    pub relative: bool,
    #[serde(default)]
    pub number: i64,
    #[serde(default, alias = "children")]
    pub levels: Vec<LevelRecord>,
}

impl LevelRecord {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn number(mut self, number: i64) -> Self {
        self.number = number;
        self
    }

    pub fn relative(mut self) -> Self {
        self.relative = true;
        self
    }

    pub fn leaf(mut self) -> Self {
        self.leaf = true;
        self
    }

    pub fn child(mut self, child: LevelRecord) -> Self {
        self.levels.push(child);
        self
    }

    fn to_level(&self) -> Level {
        Level {
            leaf: self.leaf,
            relative: self.relative,
            number: self.number,
            ..Level::new(self.label.clone())
        }
    }

    /// Build a tree with parent links and depth from this record.
    pub fn to_tree(&self) -> LevelTree {
        let mut tree = LevelTree::new(self.to_level());
        let root = tree.root();
        let mut pending: Vec<(LevelId, &LevelRecord)> = vec![(root, self)];
        while let Some((id, record)) = pending.pop() {
            for child in &record.levels {
                let child_id = tree.add_child(id, child.to_level());
                pending.push((child_id, child));
            }
        }
        tree
    }
}

/// Read a level source from a `.json` or `.toml` file.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn read_from_file(path: &Path) -> Result<LevelTree> {
    let raw = std::fs::read_to_string(path).map_err(|e| AllocError::open(path, e))?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    let record: LevelRecord = match extension.as_deref() {
        Some("json") => serde_json::from_str(&raw).map_err(|e| AllocError::open(path, e))?,
        Some("toml") => toml::from_str(&raw).map_err(|e| AllocError::open(path, e))?,
        other => {
            return Err(AllocError::open(
                path,
                format!("unsupported source format {:?} (expected json or toml)", other),
            ))
        }
    };
    let tree = record.to_tree();
    debug!(levels = tree.len(), root = %record.label, "Loaded level source");
    Ok(tree)
}
