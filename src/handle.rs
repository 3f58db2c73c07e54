//! Handles: the concrete units produced by an allocation run.

use crate::tag::{join_tags, Sequence, Tag};
use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// A per-handle callback, invoked during the Collection's Post phase
pub type HandleCall = Arc<dyn Fn(&Handle) -> anyhow::Result<()> + Send + Sync>;

/// One generated unit: a frozen tag chain plus identity
///
/// The [`Sequence`] is assigned by the owning
/// [`Collection`](crate::collection::Collection), never at mint time.
pub struct Handle {
    id: String,
    sequence: Option<Sequence>,
    root: Tag,
    family: Vec<Tag>,
    unit: Tag,
    calls: Vec<HandleCall>,
    item: Option<Box<dyn Any + Send + Sync>>,
    ignore: bool,
}

impl Handle {
    pub fn new(root: Tag, family: Vec<Tag>, unit: Tag) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sequence: None,
            root,
            family,
            unit,
            calls: Vec::new(),
            item: None,
            ignore: false,
        }
    }

    /// Opaque unique identifier
    pub fn key(&self) -> &str {
        &self.id
    }

    pub fn sequence(&self) -> Option<Sequence> {
        self.sequence
    }

    pub(crate) fn set_sequence(&mut self, sequence: Sequence) {
        self.sequence = Some(sequence);
    }

    pub fn root(&self) -> &Tag {
        &self.root
    }

    pub fn family(&self) -> &[Tag] {
        &self.family
    }

    pub fn unit(&self) -> &Tag {
        &self.unit
    }

    /// Root, family and unit tags sorted by order. With `include_sequence`, a
    /// sequence tag is placed directly after the unit; it reads `0-of-0` until
    /// the handle has been sequenced.
    pub fn tagged(&self, include_sequence: bool) -> Vec<Tag> {
        let mut tags = Vec::with_capacity(self.family.len() + 3);
        tags.push(self.root.clone());
        tags.extend(self.family.iter().cloned());
        tags.push(self.unit.clone());
        if include_sequence {
            let sequence = self.sequence.unwrap_or(Sequence::new(0, 0));
            tags.push(Tag::new(self.unit.order + 1, sequence.to_string()));
        }
        crate::tag::sort_tags(&mut tags);
        tags
    }

    /// Relative path of this unit: every tag, sequence last.
    pub fn path(&self) -> PathBuf {
        join_tags(self.tagged(true))
    }

    /// Run every attached call in order, stopping at the first error.
    pub fn call(&self) -> anyhow::Result<()> {
        for call in &self.calls {
            call(self)?;
        }
        Ok(())
    }

    pub fn set_calls<I>(&mut self, calls: I)
    where
        I: IntoIterator<Item = HandleCall>,
    {
        self.calls.extend(calls);
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn item(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.item.as_deref()
    }

    pub fn item_as<T: Any>(&self) -> Option<&T> {
        self.item.as_ref().and_then(|item| item.downcast_ref::<T>())
    }

    pub fn set_item<T: Any + Send + Sync>(&mut self, item: T) {
        self.item = Some(Box::new(item));
    }

    pub fn ignored(&self) -> bool {
        self.ignore
    }

    pub fn set_ignored(&mut self, ignore: bool) {
        self.ignore = ignore;
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("id", &self.id)
            .field("sequence", &self.sequence)
            .field("root", &self.root)
            .field("family", &self.family)
            .field("unit", &self.unit)
            .field("calls", &self.calls.len())
            .field("has_item", &self.item.is_some())
            .field("ignore", &self.ignore)
            .finish()
    }
}
