//! Level Tree
//!
//! The declarative allocation tree. Nodes live in an arena owned by
//! [`LevelTree`]; children are held as ordered ids and the parent relation
//! is a plain back-index used only to rebuild ancestor chains.

pub mod directory;
pub mod source;

use crate::tag::Tag;

pub use directory::{read_from_directory, DEFAULT_COUNTED_PATTERN};
pub use source::{read_from_file, LevelRecord};

/// Index of a node within its [`LevelTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LevelId(usize);

/// One node of the allocation tree
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub label: String,
    /// Explicitly flagged generation point
    pub leaf: bool,
    /// `number` is a percentage of the parent total
    pub relative: bool,
    pub number: i64,
    /// Share of the parent total, computed by proportional enumeration
    pub percent: f64,
    /// Integer count, computed top-down by proportional enumeration
    pub actual: i64,
    children: Vec<LevelId>,
    parent: Option<LevelId>,
    depth: usize,
}

impl Level {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            leaf: false,
            relative: false,
            number: 0,
            percent: 0.0,
            actual: 0,
            children: Vec::new(),
            parent: None,
            depth: 1,
        }
    }

    pub fn with_number(mut self, number: i64) -> Self {
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

    pub fn children(&self) -> &[LevelId] {
        &self.children
    }

    pub fn parent(&self) -> Option<LevelId> {
        self.parent
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Arena-backed rooted tree of [`Level`] nodes
///
/// Detached nodes (fresh clones not yet attached) may live in the arena; they
/// are unreachable from the root until [`LevelTree::attach`] links them.
#[derive(Debug, Clone)]
pub struct LevelTree {
    nodes: Vec<Level>,
    root: LevelId,
}

impl LevelTree {
    /// Create a tree holding only `root`.
    pub fn new(root: Level) -> Self {
        let mut root = root;
        root.parent = None;
        root.depth = 1;
        root.children.clear();
        Self {
            nodes: vec![root],
            root: LevelId(0),
        }
    }

    pub fn root(&self) -> LevelId {
        self.root
    }

    /// Number of nodes held in the arena, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: LevelId) -> &Level {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: LevelId) -> &mut Level {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: LevelId) -> &[LevelId] {
        &self.nodes[id.0].children
    }

    /// Append `level` as the last child of `parent`.
    pub fn add_child(&mut self, parent: LevelId, level: Level) -> LevelId {
        let mut level = level;
        level.children.clear();
        let id = LevelId(self.nodes.len());
        self.nodes.push(level);
        self.attach(parent, id);
        id
    }

    /// Link a detached node (and its subtree) under `parent`.
    pub fn attach(&mut self, parent: LevelId, child: LevelId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        let depth = self.nodes[parent.0].depth + 1;
        self.renotate(child, depth);
    }

    fn renotate(&mut self, id: LevelId, depth: usize) {
        let mut stack = vec![(id, depth)];
        while let Some((id, depth)) = stack.pop() {
            self.nodes[id.0].depth = depth;
            for &child in &self.nodes[id.0].children {
                stack.push((child, depth + 1));
            }
        }
    }

    /// True when explicitly flagged, or when the node has no children.
    pub fn is_leaf(&self, id: LevelId) -> bool {
        let level = self.get(id);
        level.leaf || level.children.is_empty()
    }

    pub fn is_absolute_leaf(&self, id: LevelId) -> bool {
        self.get(id).children.is_empty()
    }

    /// Pre-order visit of `start` and its subtree; siblings in declaration order.
    pub fn iterate<F>(&self, start: LevelId, mut f: F)
    where
        F: FnMut(LevelId, &Level),
    {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let level = &self.nodes[id.0];
            f(id, level);
            stack.extend(level.children.iter().rev().copied());
        }
    }

    /// Pre-order ids of `start` and its subtree.
    pub fn preorder(&self, start: LevelId) -> Vec<LevelId> {
        let mut ids = Vec::new();
        self.iterate(start, |id, _| ids.push(id));
        ids
    }

    /// First pre-order node labelled `tag`.
    pub fn find(&self, tag: &str) -> Option<LevelId> {
        self.preorder(self.root)
            .into_iter()
            .find(|&id| self.get(id).label == tag)
    }

    /// First pre-order node labelled `tag`, or the root when `tag` is empty
    /// or unmatched. Use [`LevelTree::find`] to tell the two apart.
    pub fn offset(&self, tag: &str) -> LevelId {
        if tag.is_empty() {
            return self.root;
        }
        self.find(tag).unwrap_or(self.root)
    }

    /// Every node satisfying [`LevelTree::is_leaf`], in pre-order.
    pub fn flatten(&self, start: LevelId) -> Vec<LevelId> {
        let mut leaves = Vec::new();
        self.iterate(start, |id, _| {
            if self.is_leaf(id) {
                leaves.push(id);
            }
        });
        leaves
    }

    /// Deep copy of the subtree at `id`. The copy is detached: its parent is
    /// `None` until the caller attaches it.
    pub fn clone_subtree(&mut self, id: LevelId) -> LevelId {
        let mut copy = self.nodes[id.0].clone();
        let children = std::mem::take(&mut copy.children);
        copy.parent = None;
        let new_id = LevelId(self.nodes.len());
        self.nodes.push(copy);
        for child in children {
            let cloned = self.clone_subtree(child);
            self.nodes[cloned.0].parent = Some(new_id);
            self.nodes[new_id.0].children.push(cloned);
        }
        new_id
    }

    /// `n` independent deep copies of the subtree at `id`, all detached.
    pub fn clone_multiple(&mut self, id: LevelId, n: usize) -> Vec<LevelId> {
        (0..n).map(|_| self.clone_subtree(id)).collect()
    }

    /// Labels from the root down to `id`, inclusive.
    pub fn ancestry(&self, id: LevelId) -> Vec<&str> {
        let mut chain = Vec::with_capacity(self.get(id).depth);
        let mut current = Some(id);
        while let Some(at) = current {
            let level = self.get(at);
            chain.push(level.label.as_str());
            current = level.parent;
        }
        chain.reverse();
        chain
    }

    /// Ancestor chain tags, excluding the node's own label.
    pub fn family(&self, id: LevelId) -> Vec<Tag> {
        let chain = self.ancestry(id);
        let last = chain.len().saturating_sub(1);
        chain[..last]
            .iter()
            .enumerate()
            .map(|(i, label)| Tag::new(i + 1, *label))
            .collect()
    }

    /// The node's own label, ordered by its position in the chain.
    pub fn unit(&self, id: LevelId) -> Tag {
        let chain = self.ancestry(id);
        Tag::new(chain.len(), chain[chain.len() - 1])
    }
}
