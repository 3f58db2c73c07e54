//! Properties of tree shape: flattening, branching and handle paths

use allotree::allocate::branching::expand;
use allotree::handle::Handle;
use allotree::level::LevelRecord;
use allotree::{Collection, Tag};
use proptest::prelude::*;

fn record(max_number: i64) -> impl Strategy<Value = LevelRecord> {
    let leaf = ("[A-Z][a-z]{0,5}", any::<bool>(), 0..=max_number).prop_map(|(label, leaf, number)| {
        LevelRecord {
            leaf,
            number,
            ..LevelRecord::new(label)
        }
    });
    leaf.prop_recursive(3, 24, 4, move |inner| {
        (
            "[A-Z][a-z]{0,5}",
            any::<bool>(),
            0..=max_number,
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(label, leaf, number, levels)| LevelRecord {
                leaf,
                number,
                levels,
                ..LevelRecord::new(label)
            })
    })
}

/// Test flatten returns exactly the leaves, in pre-order
#[test]
fn test_flatten_is_preorder_leaves() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&record(5), |rec| {
            let tree = rec.to_tree();
            let root = tree.root();
            let expected: Vec<_> = tree
                .preorder(root)
                .into_iter()
                .filter(|&id| tree.is_leaf(id))
                .collect();
            prop_assert_eq!(tree.flatten(root), expected);
            Ok(())
        })
        .unwrap();
}

/// Test branching changes nothing when no number exceeds one
#[test]
fn test_branching_noop_for_small_numbers() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&record(1), |rec| {
            let mut tree = rec.to_tree();
            let before = tree.len();
            let root = tree.root();
            prop_assert_eq!(expand(&mut tree, root), 0);
            prop_assert_eq!(tree.len(), before);
            Ok(())
        })
        .unwrap();
}

/// Test every copy made by branching has its own parent link
#[test]
fn test_branching_keeps_parent_links() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&record(3), |rec| {
            let mut tree = rec.to_tree();
            let root = tree.root();
            expand(&mut tree, root);
            for id in tree.preorder(root) {
                for &child in tree.children(id) {
                    prop_assert_eq!(tree.get(child).parent(), Some(id));
                    prop_assert_eq!(tree.get(child).depth(), tree.get(id).depth() + 1);
                }
            }
            Ok(())
        })
        .unwrap();
}

/// Test a single category is numbered exactly 1..N
#[test]
fn test_single_category_sequence() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(1usize..60, 1usize..4), |(n, batches)| {
            let mut collection = Collection::new();
            for _ in 0..batches {
                let handles = (0..n).map(|_| {
                    Handle::new(Tag::root("out"), vec![Tag::new(1, "Track")], Tag::new(2, "Car"))
                });
                collection.add(handles).unwrap();
            }
            let total = n * batches;
            for (i, handle) in collection.handles().iter().enumerate() {
                let sequence = handle.sequence().unwrap();
                prop_assert_eq!(sequence.number, i + 1);
                prop_assert_eq!(sequence.count, total);
            }
            Ok(())
        })
        .unwrap();
}

fn pile_or_hole(hole: bool) -> Handle {
    let unit = if hole { "Hole" } else { "Pile" };
    Handle::new(
        Tag::root("out"),
        vec![Tag::new(1, "Track"), Tag::new(2, "Obstacle")],
        Tag::new(3, unit),
    )
}

/// Test equal chains and sequences give equal paths whatever the add order
#[test]
fn test_path_independent_of_add_order() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(any::<bool>(), 1..40), |kinds| {
            // one add of everything, holes first
            let mut grouped = Collection::new();
            let mut ordered: Vec<bool> = kinds.clone();
            ordered.sort_by_key(|&hole| !hole);
            grouped
                .add(ordered.iter().map(|&hole| pile_or_hole(hole)))
                .unwrap();

            // one add per handle, in generated order
            let mut interleaved = Collection::new();
            for &hole in &kinds {
                interleaved.add(vec![pile_or_hole(hole)]).unwrap();
            }

            for unit in ["Hole", "Pile"] {
                let left: Vec<_> = grouped.category(unit).iter().map(|h| h.path()).collect();
                let right: Vec<_> = interleaved.category(unit).iter().map(|h| h.path()).collect();
                prop_assert_eq!(left, right);
            }
            Ok(())
        })
        .unwrap();
}

/// Test handle paths are stable and ordered by tag order
#[test]
fn test_path_is_stable() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &prop::collection::vec("[a-z]{1,8}", 1..6),
            |labels| {
                let family: Vec<Tag> = labels
                    .iter()
                    .enumerate()
                    .rev()
                    .map(|(i, label)| Tag::new(i + 1, label.clone()))
                    .collect();
                let handle = Handle::new(Tag::root("out"), family, Tag::new(labels.len() + 1, "unit"));
                let first = handle.path();
                prop_assert_eq!(&first, &handle.path());

                let components: Vec<String> = first
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                let mut expected = vec!["out".to_string()];
                expected.extend(labels.iter().cloned());
                expected.push("unit".to_string());
                expected.push("0-of-0".to_string());
                prop_assert_eq!(components, expected);
                Ok(())
            },
        )
        .unwrap();
}
