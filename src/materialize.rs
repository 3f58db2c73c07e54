//! On-disk materialization of handle paths.

use crate::collection::Collection;
use crate::error::Result;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Create a directory at `base/<handle path>` for every non-ignored handle.
/// Returns the number of directories requested.
#[instrument(skip(collection, base), fields(base = %base.display(), handles = collection.len()))]
pub fn materialize(collection: &Collection, base: &Path) -> Result<usize> {
    let mut created = 0;
    for handle in collection.handles().iter().filter(|h| !h.ignored()) {
        let target = base.join(handle.path());
        std::fs::create_dir_all(&target)?;
        debug!(path = %target.display(), "Materialized handle");
        created += 1;
    }
    info!(created, "Materialization completed");
    Ok(created)
}
