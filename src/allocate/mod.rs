//! Allocation
//!
//! An [`Allocator`] consumes a finished [`LevelTree`], mints one [`Handle`]
//! per generation point and drives a [`Collection`] through its phases.
//! Allocators are stateless; [`Allocators::get`] hands out a fresh instance
//! per run.

pub mod branching;
pub mod directory;
pub mod proportional;

use crate::collection::{Collection, Phase};
use crate::error::{AllocError, Result};
use crate::handle::Handle;
use crate::level::{LevelId, LevelTree};
use crate::tag::Tag;
use std::collections::BTreeMap;
use tracing::warn;

pub use branching::BranchingAllocator;
pub use directory::DirectoryAllocator;
pub use proportional::ProportionalAllocator;

/// Where an allocator's level tree comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFrom {
    /// No source is read
    None,
    /// A declarative source file
    File,
    /// An existing directory layout
    Directory,
}

/// Inputs of one allocation run
#[derive(Debug)]
pub struct AllocationRequest {
    pub tree: Option<LevelTree>,
    /// Tag placed before every handle's chain (order 0)
    pub root: Tag,
    /// Label of the node to allocate from instead of the tree root
    pub offset: Option<String>,
}

impl AllocationRequest {
    pub fn new(tree: LevelTree, root: Tag) -> Self {
        Self {
            tree: Some(tree),
            root,
            offset: None,
        }
    }

    pub fn with_offset(mut self, offset: impl Into<String>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    fn require_tree(&mut self, key: &str) -> Result<LevelTree> {
        self.tree.take().ok_or_else(|| {
            AllocError::Configuration(format!("allocator '{}' requires a level source", key))
        })
    }
}

pub trait Allocator: Send {
    /// Registry key
    fn key(&self) -> &'static str;

    fn reads_from(&self) -> ReadFrom;

    /// Mint handles from the request and add them to `collection`.
    ///
    /// On failure the collection keeps whatever was appended before the
    /// failing stage.
    fn allocate(&self, request: AllocationRequest, collection: &mut Collection) -> Result<()>;
}

/// Allocates nothing; the collection still sees its Before and After phases.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyAllocator;

impl Allocator for EmptyAllocator {
    fn key(&self) -> &'static str {
        "emp"
    }

    fn reads_from(&self) -> ReadFrom {
        ReadFrom::None
    }

    fn allocate(&self, _request: AllocationRequest, collection: &mut Collection) -> Result<()> {
        populate(collection, Vec::new())
    }
}

/// Resolve the start node for `offset`, falling back to the root.
pub(crate) fn resolve_offset(tree: &LevelTree, offset: Option<&str>) -> LevelId {
    match offset.filter(|tag| !tag.is_empty()) {
        Some(tag) => tree.find(tag).unwrap_or_else(|| {
            warn!(offset = tag, "Offset not found, allocating from root");
            tree.root()
        }),
        None => tree.root(),
    }
}

/// Reject negative requested numbers anywhere under `start`.
pub(crate) fn check_numbers(tree: &LevelTree, start: LevelId) -> Result<()> {
    for id in tree.preorder(start) {
        let level = tree.get(id);
        if level.number < 0 {
            return Err(AllocError::Allocation(format!(
                "level '{}' requests a negative number ({})",
                level.label, level.number
            )));
        }
    }
    Ok(())
}

pub(crate) fn mint(tree: &LevelTree, id: LevelId, root: &Tag) -> Handle {
    Handle::new(root.clone(), tree.family(id), tree.unit(id))
}

/// Before, one `add` of every minted handle, After.
pub(crate) fn populate(collection: &mut Collection, handles: Vec<Handle>) -> Result<()> {
    collection.run_phase(Phase::Before)?;
    collection.add(handles)?;
    collection.run_phase(Phase::After)
}

type Constructor = fn() -> Box<dyn Allocator>;

/// String-keyed allocator registry
#[derive(Clone)]
pub struct Allocators {
    registry: BTreeMap<String, Constructor>,
}

impl Default for Allocators {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Allocators {
    /// Registry holding the empty, proportional, branching and
    /// directory-derived allocators under short and long keys.
    pub fn builtin() -> Self {
        let mut allocators = Self {
            registry: BTreeMap::new(),
        };
        allocators.register(&["emp", "empty"], || Box::new(EmptyAllocator));
        allocators.register(&["rsp", "proportional"], || Box::new(ProportionalAllocator));
        allocators.register(&["bge", "branching"], || Box::new(BranchingAllocator));
        allocators.register(&["edf", "directory"], || Box::new(DirectoryAllocator));
        allocators
    }

    pub fn register(&mut self, keys: &[&str], constructor: Constructor) {
        for key in keys {
            self.registry.insert(key.to_string(), constructor);
        }
    }

    /// A fresh allocator for `key`
    pub fn get(&self, key: &str) -> Option<Box<dyn Allocator>> {
        self.registry.get(key).map(|constructor| constructor())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.registry.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.registry.keys().map(String::as_str)
    }
}
