//! Configuration System
//!
//! Layered run configuration: defaults, then the global config file, then
//! `<workspace>/allotree.toml`, then `ALLOTREE_*` environment variables.

use crate::allocate::Allocators;
use crate::error::{AllocError, Result};
use crate::level::DEFAULT_COUNTED_PATTERN;
use crate::logging::LoggingConfig;
use crate::processor::ErrorPolicy;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the workspace-level config file
pub const WORKSPACE_CONFIG_FILE: &str = "allotree.toml";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllotreeConfig {
    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for one allocation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Output root; becomes the order-0 tag of every handle. For
    /// directory-derived allocation it is the directory that is read.
    pub root: Option<PathBuf>,

    /// Declarative level source (`.json` or `.toml`)
    pub source: Option<PathBuf>,

    /// Allocator registry key
    #[serde(default = "default_allocator")]
    pub allocator: String,

    /// Label of the level to allocate from
    pub offset: Option<String>,

    /// Entry names counted by the directory loader
    #[serde(default = "default_counted_pattern")]
    pub counted_pattern: String,

    /// Collect per-category statistics
    #[serde(default = "default_true")]
    pub statistics: bool,

    #[serde(default)]
    pub on_error: ErrorPolicy,
}

fn default_allocator() -> String {
    "emp".to_string()
}

fn default_counted_pattern() -> String {
    DEFAULT_COUNTED_PATTERN.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            root: None,
            source: None,
            allocator: default_allocator(),
            offset: None,
            counted_pattern: default_counted_pattern(),
            statistics: default_true(),
            on_error: ErrorPolicy::default(),
        }
    }
}

impl RunConfig {
    /// Check that a run can start against `allocators`.
    pub fn validate(&self, allocators: &Allocators) -> Result<()> {
        if self.root.is_none() {
            return Err(AllocError::Configuration("no root specified".to_string()));
        }
        if !allocators.contains(&self.allocator) {
            let known: Vec<&str> = allocators.keys().collect();
            return Err(AllocError::Configuration(format!(
                "unknown allocator '{}' (known: {})",
                self.allocator,
                known.join(", ")
            )));
        }
        Ok(())
    }
}

/// Path to the global config file, e.g. `~/.config/allotree/config.toml`
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "allotree")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// `ALLOTREE_RUN__ALLOCATOR=bge` sets `run.allocator`
fn environment() -> Environment {
    Environment::with_prefix("ALLOTREE")
        .prefix_separator("_")
        .separator("__")
}

/// Loads [`AllotreeConfig`] from layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, global file, workspace file and environment.
    pub fn load(workspace: &Path) -> std::result::Result<AllotreeConfig, ConfigError> {
        let mut builder = Config::builder();
        if let Some(global) = global_config_path().filter(|p| p.exists()) {
            debug!(path = %global.display(), "Using global config");
            builder = builder.add_source(File::with_name(&global.to_string_lossy()).required(false));
        }
        let local = workspace.join(WORKSPACE_CONFIG_FILE);
        if local.exists() {
            debug!(path = %local.display(), "Using workspace config");
            builder = builder.add_source(File::with_name(&local.to_string_lossy()).required(false));
        }
        builder
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load a single explicit file, still allowing environment overrides.
    pub fn load_from_file(path: &Path) -> std::result::Result<AllotreeConfig, ConfigError> {
        Config::builder()
            .add_source(File::with_name(&path.to_string_lossy()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}
