//! Branching expansion
//!
//! Grows the tree shape itself: every declared leaf child with
//! `number > 1` gains `number - 1` deep-copied siblings. Afterwards each
//! leaf (explicit or childless) mints exactly one handle.

use super::{check_numbers, mint, populate, resolve_offset, AllocationRequest, Allocator, ReadFrom};
use crate::collection::Collection;
use crate::error::Result;
use crate::level::{LevelId, LevelTree};
use tracing::{debug, info, instrument};

#[derive(Debug, Default, Clone, Copy)]
pub struct BranchingAllocator;

impl Allocator for BranchingAllocator {
    fn key(&self) -> &'static str {
        "bge"
    }

    fn reads_from(&self) -> ReadFrom {
        ReadFrom::File
    }

    #[instrument(skip_all, fields(allocator = "bge", offset = ?request.offset))]
    fn allocate(&self, mut request: AllocationRequest, collection: &mut Collection) -> Result<()> {
        let mut tree = request.require_tree(self.key())?;
        let start = resolve_offset(&tree, request.offset.as_deref());
        check_numbers(&tree, start)?;
        let cloned = expand(&mut tree, start);

        let handles: Vec<_> = tree
            .flatten(start)
            .into_iter()
            .map(|id| mint(&tree, id, &request.root))
            .collect();
        info!(
            cloned,
            minted = handles.len(),
            "Branching allocation minted handles"
        );
        populate(collection, handles)
    }
}

/// Expand every node reachable from `start` once, parents before children.
/// Returns the number of subtree copies attached.
pub fn expand(tree: &mut LevelTree, start: LevelId) -> usize {
    let mut cloned = 0;
    let mut pending = vec![start];
    while let Some(id) = pending.pop() {
        cloned += branch(tree, id);
        pending.extend(tree.children(id).iter().rev().copied());
    }
    cloned
}

/// Replicate the declared leaf children of `parent`. Copies appended here are
/// not themselves replicated again at this level.
fn branch(tree: &mut LevelTree, parent: LevelId) -> usize {
    let declared = tree.children(parent).to_vec();
    let mut cloned = 0;
    for child in declared {
        let number = tree.get(child).number;
        if tree.is_leaf(child) && number > 1 {
            let copies = tree.clone_multiple(child, (number - 1) as usize);
            cloned += copies.len();
            for copy in copies {
                tree.attach(parent, copy);
            }
            debug!(level = %tree.get(child).label, copies = number, "Branched level");
        }
    }
    cloned
}
