//! Processor: runs one configured allocation end to end.

use crate::allocate::{AllocationRequest, Allocators, ReadFrom};
use crate::collection::Collection;
use crate::config::RunConfig;
use crate::error::{AllocError, Result};
use crate::level::{read_from_directory, read_from_file};
use crate::statistics::Statistics;
use crate::tag::Tag;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

/// What [`Processor::process`] does with a failed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log the error and return no collection
    #[default]
    Continue,
    /// Log the error and exit the process with status 1
    Exit,
    Panic,
}

pub struct Processor {
    config: RunConfig,
    allocators: Allocators,
}

impl Processor {
    pub fn new(config: RunConfig) -> Result<Self> {
        Self::with_allocators(config, Allocators::builtin())
    }

    pub fn with_allocators(config: RunConfig, allocators: Allocators) -> Result<Self> {
        config.validate(&allocators)?;
        Ok(Self { config, allocators })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run into a fresh collection, returning the error unhandled.
    pub fn try_process(&self) -> Result<Collection> {
        let mut collection = Collection::new();
        if self.config.statistics {
            collection.enable_statistics(Statistics::new());
        }
        self.process_into(&mut collection)?;
        Ok(collection)
    }

    /// Run into a caller-prepared collection (custom hooks, calls, statistics).
    #[instrument(skip_all, fields(allocator = %self.config.allocator))]
    pub fn process_into(&self, collection: &mut Collection) -> Result<()> {
        let allocator = self.allocators.get(&self.config.allocator).ok_or_else(|| {
            AllocError::Configuration(format!("unknown allocator '{}'", self.config.allocator))
        })?;
        let root = self
            .config
            .root
            .as_deref()
            .ok_or_else(|| AllocError::Configuration("no root specified".to_string()))?;

        info!(root = %root.display(), "Begin processing");
        if let Some(offset) = &self.config.offset {
            info!(offset = %offset, "Processing with offset");
        }

        let (tree, root_tag) = match allocator.reads_from() {
            ReadFrom::None => (None, Tag::root(root.to_string_lossy())),
            ReadFrom::File => {
                let source = self.config.source.as_deref().ok_or_else(|| {
                    AllocError::Configuration(format!(
                        "allocator '{}' requires a source file",
                        allocator.key()
                    ))
                })?;
                (Some(read_from_file(source)?), Tag::root(root.to_string_lossy()))
            }
            ReadFrom::Directory => {
                let tree = read_from_directory(root, &self.config.counted_pattern)?;
                // handles resolve back to the paths that were read
                let parent = root
                    .parent()
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (Some(tree), Tag::root(parent))
            }
        };

        let request = AllocationRequest {
            tree,
            root: root_tag,
            offset: self.config.offset.clone(),
        };
        allocator.allocate(request, collection)?;
        info!(handles = collection.len(), "Finished processing");
        Ok(())
    }

    /// Run and deliver any error to `handler`.
    pub fn process_with<F>(&self, handler: F) -> Option<Collection>
    where
        F: FnOnce(&AllocError),
    {
        match self.try_process() {
            Ok(collection) => Some(collection),
            Err(e) => {
                handler(&e);
                None
            }
        }
    }

    /// Run and apply the configured [`ErrorPolicy`] to any error.
    pub fn process(&self) -> Option<Collection> {
        let policy = self.config.on_error;
        self.process_with(|e| match policy {
            ErrorPolicy::Continue => error!("Allocation failed: {}", e),
            ErrorPolicy::Exit => {
                error!("Allocation failed: {}", e);
                eprintln!("FATAL: {}", e);
                std::process::exit(1);
            }
            ErrorPolicy::Panic => panic!("allocation failed: {}", e),
        })
    }
}
