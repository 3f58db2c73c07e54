//! Directory-derived level sources
//!
//! Rebuilds a level tree from an on-disk layout: directories become levels,
//! entries whose names match the counted pattern add one to their parent's
//! `number`.

use super::{Level, LevelId, LevelTree};
use crate::error::{AllocError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// Matches the string form of a [`Sequence`](crate::tag::Sequence)
pub const DEFAULT_COUNTED_PATTERN: &str = r"^\d+-of-\d+$";

/// Walk `path` and derive a level tree; the root is labelled with the
/// directory's base name.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn read_from_directory(path: &Path, pattern: &str) -> Result<LevelTree> {
    let counted = Regex::new(pattern).map_err(|e| {
        AllocError::Configuration(format!("invalid counted pattern {:?}: {}", pattern, e))
    })?;
    if !path.is_dir() {
        return Err(AllocError::open(path, "not a directory"));
    }

    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mut tree = LevelTree::new(Level::new(label));
    let mut index: HashMap<PathBuf, LevelId> = HashMap::new();
    index.insert(path.to_path_buf(), tree.root());

    let mut entries = WalkDir::new(path)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter();
    while let Some(entry) = entries.next() {
        let entry = entry.map_err(|e| AllocError::open(path, e))?;
        let parent = match entry.path().parent().and_then(|p| index.get(p)) {
            Some(&parent) => parent,
            None => continue,
        };
        let name = entry.file_name().to_string_lossy();
        if counted.is_match(&name) {
            tree.get_mut(parent).number += 1;
            if entry.file_type().is_dir() {
                entries.skip_current_dir();
            }
        } else if entry.file_type().is_dir() {
            let id = tree.add_child(parent, Level::new(name.into_owned()));
            index.insert(entry.path().to_path_buf(), id);
        }
    }

    debug!(levels = tree.len(), "Derived level tree from directory");
    Ok(tree)
}
