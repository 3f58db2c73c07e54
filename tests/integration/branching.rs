//! Integration tests for branching expansion from a TOML level source

use super::test_utils::*;
use tempfile::TempDir;

#[test]
fn test_bge_fixture_statistics() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_fixture(temp_dir.path(), "bge.toml", BGE_TOML);

    let collection = run(&temp_dir.path().join("testBGE"), Some(&source), "bge", None);
    assert_stats(collection.report().unwrap(), BGE_EXPECTED);
    assert_eq!(collection.len(), 3302);
}

#[test]
fn test_bge_fixture_offset() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_fixture(temp_dir.path(), "bge.toml", BGE_TOML);

    let collection = run(
        &temp_dir.path().join("testBGEOffset"),
        Some(&source),
        "bge",
        Some("Star"),
    );
    let report = collection.report().unwrap();
    assert_stats(report, BGE_STAR_EXPECTED);
    assert!(!report.contains_key("GALAXY"));
}

/// Test sequences number within each category
#[test]
fn test_bge_sequences_per_category() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_fixture(temp_dir.path(), "bge.toml", BGE_TOML);

    let collection = run(std::path::Path::new("out"), Some(&source), "bge", Some("Star"));
    let trees = collection.category("Trees");
    assert_eq!(trees.len(), 30);
    for (i, handle) in trees.iter().enumerate() {
        let sequence = handle.sequence().unwrap();
        assert_eq!(sequence.number, i + 1);
        assert_eq!(sequence.count, 30);
    }
}
