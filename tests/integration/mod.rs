//! Integration tests for allocation, collection hooks and configuration

mod branching;
mod collection_pipeline;
pub mod test_utils;
