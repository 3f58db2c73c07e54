//! Proportional distribution
//!
//! Pushes an integer `actual` count down the tree. Relative children take
//! `number / 100` of their parent; absolute children take `number / from`.
//! When relative children are present, whatever share the siblings leave
//! unclaimed (or overclaim) is spread evenly across the relative children
//! only. Counts are floored; rounding loss is not reconciled.

use super::{check_numbers, mint, populate, resolve_offset, AllocationRequest, Allocator, ReadFrom};
use crate::collection::Collection;
use crate::error::{AllocError, Result};
use crate::level::{LevelId, LevelTree};
use tracing::{debug, info, instrument};

#[derive(Debug, Default, Clone, Copy)]
pub struct ProportionalAllocator;

impl Allocator for ProportionalAllocator {
    fn key(&self) -> &'static str {
        "rsp"
    }

    fn reads_from(&self) -> ReadFrom {
        ReadFrom::File
    }

    #[instrument(skip_all, fields(allocator = "rsp", offset = ?request.offset))]
    fn allocate(&self, mut request: AllocationRequest, collection: &mut Collection) -> Result<()> {
        let mut tree = request.require_tree(self.key())?;
        let start = resolve_offset(&tree, request.offset.as_deref());
        distribute(&mut tree, start)?;

        let mut handles = Vec::new();
        for id in tree.flatten(start) {
            for _ in 0..tree.get(id).actual {
                handles.push(mint(&tree, id, &request.root));
            }
        }
        info!(
            from = tree.get(start).number,
            minted = handles.len(),
            "Proportional allocation minted handles"
        );
        populate(collection, handles)
    }
}

/// Enumerate the subtree at `start` using its own `number` as the total.
pub fn distribute(tree: &mut LevelTree, start: LevelId) -> Result<()> {
    check_numbers(tree, start)?;
    let from = tree.get(start).number;
    let level = tree.get_mut(start);
    level.percent = 1.0;
    level.actual = from;
    enumerate(tree, start, from)
}

/// Compute `percent` and `actual` for every descendant of `parent`, given
/// the parent's total `from`.
pub fn enumerate(tree: &mut LevelTree, parent: LevelId, from: i64) -> Result<()> {
    let children = tree.children(parent).to_vec();
    let mut relative = 0usize;

    for &child in &children {
        let level = tree.get_mut(child);
        level.percent = if level.relative {
            relative += 1;
            level.number as f64 / 100.0
        } else if from == 0 {
            0.0
        } else {
            level.number as f64 / from as f64
        };
    }

    if relative > 0 {
        let claimed: f64 = children.iter().map(|&c| tree.get(c).percent).sum();
        if claimed != 1.0 {
            let spread = (1.0 - claimed) / relative as f64;
            for &child in &children {
                let level = tree.get_mut(child);
                if level.relative {
                    level.percent += spread;
                }
            }
        }
    }

    for &child in &children {
        let level = tree.get_mut(child);
        let share = from as f64 * level.percent;
        if !share.is_finite() {
            return Err(AllocError::Allocation(format!(
                "level '{}' has a non-finite share of {}",
                level.label, from
            )));
        }
        if level.relative && level.percent < 0.0 {
            return Err(AllocError::Allocation(format!(
                "relative level '{}' cannot be normalized: siblings claim more than the parent total",
                level.label
            )));
        }
        level.actual = if level.relative {
            share.floor() as i64
        } else if from == 0 {
            0
        } else {
            // floor(from * number / from) is number; avoid the float round trip
            level.number
        };
        debug!(
            level = %level.label,
            percent = level.percent,
            actual = level.actual,
            "Enumerated level"
        );
        let actual = level.actual;
        enumerate(tree, child, actual)?;
    }
    Ok(())
}
