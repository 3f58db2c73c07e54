//! Shared fixtures and helpers for integration tests

use allotree::config::RunConfig;
use allotree::statistics::StatMap;
use allotree::{Collection, Processor};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Serializes tests that mutate process environment variables
pub static ENV_MUTEX: Mutex<()> = Mutex::new(());

pub const RSP_JSON: &str = r#"{
  "tag": "RSP_TEST",
  "number": 100,
  "levels": [
    {"tag": "Car", "number": 7},
    {"tag": "Road", "relative": true, "number": 14, "levels": [
      {"tag": "Straight", "relative": true, "number": 50},
      {"tag": "Curved", "relative": true, "number": 50}
    ]},
    {"tag": "Obstacle", "number": 40, "levels": [
      {"tag": "Hole", "number": 13},
      {"tag": "Pile", "number": 13},
      {"tag": "Cow", "number": 13},
      {"tag": "BabyCarriage", "number": 1}
    ]},
    {"tag": "PowerUps", "relative": true, "number": 50, "levels": [
      {"tag": "Fast", "relative": true},
      {"tag": "Missle", "relative": true},
      {"tag": "Star", "relative": true},
      {"tag": "Laser", "relative": true, "levels": [
        {"tag": "Kill", "relative": true},
        {"tag": "Slow", "relative": true},
        {"tag": "Stop", "relative": true}
      ]},
      {"tag": "OilSlick", "relative": true},
      {"tag": "Teleport", "relative": true},
      {"tag": "Other", "relative": true}
    ]}
  ]
}"#;

pub const BGE_TOML: &str = r#"
tag = "BGE_TEST"
number = 0

[[levels]]
tag = "Universe"
leaf = true
number = 2

  [[levels.levels]]
  tag = "Galaxy"
  leaf = true
  number = 10

    [[levels.levels.levels]]
    tag = "Star"
    leaf = true
    number = 2

      [[levels.levels.levels.levels]]
      tag = "Planet"
      leaf = true
      number = 3

        [[levels.levels.levels.levels.levels]]
        tag = "Civilization"
        number = 1

        [[levels.levels.levels.levels.levels]]
        tag = "Trees"
        number = 10

        [[levels.levels.levels.levels.levels]]
        tag = "Rocks"
        number = 10

    [[levels.levels.levels]]
    tag = "Asteroid"
    number = 10

    [[levels.levels.levels]]
    tag = "BlackHole"

      [[levels.levels.levels.levels]]
      tag = "Type1"
      number = 5

      [[levels.levels.levels.levels]]
      tag = "Type2"
      number = 2

      [[levels.levels.levels.levels]]
      tag = "Type3"
      number = 2

      [[levels.levels.levels.levels]]
      tag = "Type4"
      number = 1

    [[levels.levels.levels]]
    tag = "Dust"
    number = 10
"#;

pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

pub fn run(root: &Path, source: Option<&Path>, allocator: &str, offset: Option<&str>) -> Collection {
    let processor = Processor::new(RunConfig {
        root: Some(root.to_path_buf()),
        source: source.map(Path::to_path_buf),
        allocator: allocator.to_string(),
        offset: offset.map(str::to_string),
        ..Default::default()
    })
    .unwrap();
    processor.try_process().unwrap()
}

/// Every expected key is present with the expected count
pub fn assert_stats(have: &StatMap, expected: &[(&str, i64)]) {
    for (key, count) in expected {
        assert_eq!(
            have.get(*key).copied(),
            Some(*count),
            "count for {} in {:?}",
            key,
            have
        );
    }
}

pub const RSP_EXPECTED: &[(&str, i64)] = &[
    ("CAR", 7),
    ("STRAIGHT", 4),
    ("CURVED", 4),
    ("HOLE", 13),
    ("PILE", 13),
    ("COW", 13),
    ("BABYCARRIAGE", 1),
    ("FAST", 6),
    ("MISSLE", 6),
    ("STAR", 6),
    ("KILL", 2),
    ("SLOW", 2),
    ("STOP", 2),
    ("OILSLICK", 6),
    ("TELEPORT", 6),
    ("OTHER", 6),
    ("TOTAL", 97),
];

pub const RSP_OBSTACLE_EXPECTED: &[(&str, i64)] = &[
    ("HOLE", 13),
    ("PILE", 13),
    ("COW", 13),
    ("BABYCARRIAGE", 1),
    ("TOTAL", 40),
];

pub const BGE_EXPECTED: &[(&str, i64)] = &[
    ("UNIVERSE", 2),
    ("GALAXY", 20),
    ("STAR", 40),
    ("PLANET", 120),
    ("CIVILIZATION", 120),
    ("TREES", 1200),
    ("ROCKS", 1200),
    ("ASTEROID", 200),
    ("DUST", 200),
    ("TYPE1", 100),
    ("TYPE2", 40),
    ("TYPE3", 40),
    ("TYPE4", 20),
    ("TOTAL", 3302),
];

pub const BGE_STAR_EXPECTED: &[(&str, i64)] = &[
    ("STAR", 1),
    ("PLANET", 3),
    ("CIVILIZATION", 3),
    ("TREES", 30),
    ("ROCKS", 30),
    ("TOTAL", 67),
];
