//! CLI domain: parse, route, output and presentation only.
//! Allocation itself lives in [`crate::processor`].

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, RunArgs};
pub use presentation::{format_paths, format_stats_json, format_stats_text};
pub use route::RunContext;
