//! Ordered path segments and cohort positions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A labeled, orderable path segment
///
/// The root tag of a run carries order 0; ancestor chain entries are
/// numbered from 1 in root-to-leaf order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub order: usize,
    pub value: String,
}

impl Tag {
    pub fn new(order: usize, value: impl Into<String>) -> Self {
        Self {
            order,
            value: value.into(),
        }
    }

    /// The run root tag (order 0)
    pub fn root(value: impl Into<String>) -> Self {
        Self::new(0, value)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A unit's 1-based position and cohort size within its category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sequence {
    pub number: usize,
    pub count: usize,
}

impl Sequence {
    pub fn new(number: usize, count: usize) -> Self {
        Self { number, count }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-of-{}", self.number, self.count)
    }
}

/// Stable sort of tags by ascending order.
pub fn sort_tags(tags: &mut [Tag]) {
    tags.sort_by_key(|t| t.order);
}

/// Sort the tags and join their values with the platform separator.
pub fn join_tags(mut tags: Vec<Tag>) -> PathBuf {
    sort_tags(&mut tags);
    tags.iter().map(|t| t.value.as_str()).collect()
}
