//! Directory-derived allocation
//!
//! Reads back a tree derived from an on-disk layout and mints one handle per
//! counted entry found under each level.

use super::{check_numbers, mint, populate, resolve_offset, AllocationRequest, Allocator, ReadFrom};
use crate::collection::Collection;
use crate::error::Result;
use tracing::{info, instrument};

#[derive(Debug, Default, Clone, Copy)]
pub struct DirectoryAllocator;

impl Allocator for DirectoryAllocator {
    fn key(&self) -> &'static str {
        "edf"
    }

    fn reads_from(&self) -> ReadFrom {
        ReadFrom::Directory
    }

    #[instrument(skip_all, fields(allocator = "edf", offset = ?request.offset))]
    fn allocate(&self, mut request: AllocationRequest, collection: &mut Collection) -> Result<()> {
        let tree = request.require_tree(self.key())?;
        let start = resolve_offset(&tree, request.offset.as_deref());
        check_numbers(&tree, start)?;

        let mut handles = Vec::new();
        for id in tree.preorder(start) {
            for _ in 0..tree.get(id).number {
                handles.push(mint(&tree, id, &request.root));
            }
        }
        info!(minted = handles.len(), "Directory allocation minted handles");
        populate(collection, handles)
    }
}
