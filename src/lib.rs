//! Allotree: hierarchical quantity allocation
//!
//! A tree of labelled [`level::Level`]s declares how many of each thing to
//! make. An [`allocate::Allocator`] turns the tree into a flat
//! [`collection::Collection`] of [`handle::Handle`]s, each addressable by
//! its tag path and numbered `N-of-M` within its category. Collections run
//! phase hooks around every insertion (sequencing, statistics, per-handle
//! calls) and can be materialized as a directory tree, which the
//! directory-derived allocator reads back.

pub mod allocate;
pub mod cli;
pub mod collection;
pub mod config;
pub mod error;
pub mod handle;
pub mod level;
pub mod logging;
pub mod materialize;
pub mod processor;
pub mod statistics;
pub mod tag;

pub use allocate::{AllocationRequest, Allocator, Allocators};
pub use collection::{Collection, Hook, Phase};
pub use error::{AllocError, Result};
pub use handle::Handle;
pub use level::{Level, LevelId, LevelTree};
pub use processor::{ErrorPolicy, Processor};
pub use statistics::Statistics;
pub use tag::{Sequence, Tag};
