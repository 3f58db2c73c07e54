//! Integration tests for hooks and handle calls around a full allocation

use super::test_utils::*;
use allotree::config::RunConfig;
use allotree::handle::{Handle, HandleCall};
use allotree::statistics::Statistics;
use allotree::{AllocError, Collection, Hook, Phase, Processor};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn rsp_processor(temp_dir: &TempDir) -> Processor {
    let source = write_fixture(temp_dir.path(), "rsp.json", RSP_JSON);
    Processor::new(RunConfig {
        root: Some("out".into()),
        source: Some(source),
        allocator: "rsp".to_string(),
        ..Default::default()
    })
    .unwrap()
}

/// Test handle calls see every handle with its final sequence
#[test]
fn test_handle_calls_observe_sequenced_handles() {
    let temp_dir = TempDir::new().unwrap();
    let processor = rsp_processor(&temp_dir);

    let seen: Arc<Mutex<HashMap<String, String>>> = Arc::new(Mutex::new(HashMap::new()));
    let recorder = Arc::clone(&seen);
    let record: HandleCall = Arc::new(move |h: &Handle| -> anyhow::Result<()> {
        recorder
            .lock()
            .unwrap()
            .insert(h.key().to_string(), h.path().display().to_string());
        Ok(())
    });

    let mut collection = Collection::new();
    collection.set_handle_calls(vec![record]);
    processor.process_into(&mut collection).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), collection.len());
    for handle in collection.handles() {
        assert_eq!(seen[handle.key()], handle.path().display().to_string());
        assert!(!handle.path().ends_with("0-of-0"));
    }
}

/// Test phases run in Before, Pre, Post, After order across one allocation
#[test]
fn test_phase_order_around_allocation() {
    let temp_dir = TempDir::new().unwrap();
    let processor = rsp_processor(&temp_dir);

    let log: Arc<Mutex<Vec<(Phase, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    let mut collection = Collection::new();
    for phase in [Phase::Before, Phase::Pre, Phase::Post, Phase::After] {
        let log = Arc::clone(&log);
        collection.add_hook(
            phase,
            Hook::custom(move |c: &mut Collection| {
                log.lock().unwrap().push((phase, c.len()));
                Ok(())
            }),
        );
    }
    processor.process_into(&mut collection).unwrap();

    let log = log.lock().unwrap();
    assert_eq!(
        *log,
        vec![
            (Phase::Before, 0),
            (Phase::Pre, 0),
            (Phase::Post, 97),
            (Phase::After, 97),
        ]
    );
}

/// Test a failing After hook surfaces as a hook error with handles kept
#[test]
fn test_failing_hook_reports_phase() {
    let temp_dir = TempDir::new().unwrap();
    let processor = rsp_processor(&temp_dir);

    let mut collection = Collection::new();
    collection.add_hook(
        Phase::After,
        Hook::custom(|_: &mut Collection| Err(anyhow::anyhow!("disk full"))),
    );
    let err = processor.process_into(&mut collection).unwrap_err();
    match err {
        AllocError::Hook { phase, message } => {
            assert_eq!(phase, Phase::After);
            assert!(message.contains("disk full"));
        }
        other => panic!("expected hook error, got {:?}", other),
    }
    assert_eq!(collection.len(), 97);
}

/// Test custom statistics functions run alongside category counts
#[test]
fn test_custom_statistics() {
    let temp_dir = TempDir::new().unwrap();
    let processor = rsp_processor(&temp_dir);

    let statistics = Statistics::new()
        .with_per_handle(|h, counts| {
            if h.family().iter().any(|t| t.value == "PowerUps") {
                *counts.entry("POWERUP_TOTAL".to_string()).or_insert(0) += 1;
            }
            Ok(())
        })
        .with_rolling(|counts| {
            let peak = counts.values().copied().max().unwrap_or(0);
            counts.insert("PEAK".to_string(), peak);
            Ok(())
        });

    let mut collection = Collection::new();
    collection.enable_statistics(statistics);
    processor.process_into(&mut collection).unwrap();

    let stats = collection.statistics().unwrap();
    assert_eq!(stats.get("POWERUP_TOTAL"), 42);
    assert_eq!(stats.total(), 97);
    assert_eq!(stats.get("PEAK"), 97);
}

/// Test ignored handles are excluded from statistics
#[test]
fn test_ignored_handles_skip_statistics() {
    let temp_dir = TempDir::new().unwrap();
    let processor = rsp_processor(&temp_dir);

    let mut collection = Collection::new();
    collection.enable_statistics(Statistics::new());
    processor.process_into(&mut collection).unwrap();

    for handle in collection.handles_mut() {
        if handle.unit().value == "Cow" {
            handle.set_ignored(true);
        }
    }
    collection.run_phase(Phase::After).unwrap();

    let stats = collection.statistics().unwrap();
    assert_eq!(stats.get("COW"), 0);
    assert_eq!(stats.total(), 97 - 13);
}
