//! CLI route: run context and the single dispatch table.

use crate::allocate::Allocators;
use crate::cli::parse::{Commands, RunArgs};
use crate::cli::presentation::{format_paths, format_stats_json, format_stats_text};
use crate::config::{AllotreeConfig, ConfigLoader, RunConfig};
use crate::error::{AllocError, Result};
use crate::materialize::materialize;
use crate::processor::Processor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Runtime context for CLI execution: loaded configuration and allocator registry.
pub struct RunContext {
    workspace_root: PathBuf,
    config: AllotreeConfig,
    allocators: Allocators,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        debug!(workspace = %workspace_root.display(), "Loaded configuration");
        Ok(Self {
            workspace_root,
            config,
            allocators: Allocators::builtin(),
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &AllotreeConfig {
        &self.config
    }

    /// Loaded `[run]` settings with command-line overrides applied.
    pub fn run_config(&self, args: &RunArgs) -> RunConfig {
        let mut run = self.config.run.clone();
        if let Some(root) = &args.root {
            run.root = Some(root.clone());
        }
        if let Some(source) = &args.source {
            run.source = Some(source.clone());
        }
        if let Some(allocator) = &args.allocator {
            run.allocator = allocator.clone();
        }
        if let Some(offset) = &args.offset {
            run.offset = Some(offset.clone());
        }
        run
    }

    fn processor(&self, args: &RunArgs) -> Result<Processor> {
        Processor::with_allocators(self.run_config(args), self.allocators.clone())
    }

    pub fn execute(&self, command: &Commands) -> Result<String> {
        match command {
            Commands::Paths { run } => {
                let collection = self.processor(run)?.try_process()?;
                Ok(format_paths(&collection))
            }
            Commands::Stats { run, format } => {
                let mut run_config = self.run_config(run);
                run_config.statistics = true;
                let processor = Processor::with_allocators(run_config, self.allocators.clone())?;
                let collection = processor.try_process()?;
                let report = collection.report().cloned().unwrap_or_default();
                match format.as_str() {
                    "json" => format_stats_json(&report),
                    "text" => Ok(format_stats_text(&report)),
                    other => Err(AllocError::Configuration(format!(
                        "Invalid format: {} (must be 'text' or 'json')",
                        other
                    ))),
                }
            }
            Commands::Materialize { run, into } => {
                let collection = self.processor(run)?.try_process()?;
                let created = materialize(&collection, into)?;
                info!(created, into = %into.display(), "Materialized collection");
                Ok(format!(
                    "Created {} handle directories under {}",
                    created,
                    into.display()
                ))
            }
            Commands::Allocators => Ok(self.allocators.keys().collect::<Vec<_>>().join("\n")),
        }
    }
}
