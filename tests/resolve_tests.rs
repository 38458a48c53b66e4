//! Integration tests resolving bound materials on a loaded office scene.

use std::fs;

use matbind::material::{BindingStrength, Purpose, ResolverSettings};
use matbind::prelude::*;

use tempfile::TempDir;

const OFFICE_SET: &str = include_str!("data/office_set.json");

const CUP_GRP: &str = "/Office_set/Desk_Assembly/Cup_grp";
const SHAFT: &str = "/Office_set/Desk_Assembly/Cup_grp/Pencil_1/Geom/Shaft";
const ERASER_HEAD: &str = "/Office_set/Desk_Assembly/Cup_grp/Pencil_1/Geom/EraserHead";

const DEFAULT: &str = "/Office_set/Materials/Default";
const YELLOW_PAINT: &str = "/Office_set/Materials/YellowPaint";
const PINK_PEARL: &str = "/Office_set/Materials/PinkPearl";

fn p(s: &str) -> ScenePath {
    s.parse().expect("valid path")
}

/// Write the office scene into a temp dir and load it from disk.
fn open_office_set() -> (TempDir, Stage) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("office_set.json");
    fs::write(&path, OFFICE_SET).expect("Failed to write scene");
    let stage = Stage::open(&path).expect("Failed to open scene");
    (dir, stage)
}

fn bound(stage: &Stage, prim: &str, purpose: &str, collection: &str) -> Option<String> {
    resolve_bound_material(&stage.prim_at_path(&p(prim)), purpose, collection)
        .expect("resolution failed")
        .map(|m| m.path().to_string())
}

#[test]
fn test_cup_group_gets_default_material() {
    let (_dir, stage) = open_office_set();

    // No collection includes the cup group
    assert_eq!(bound(&stage, CUP_GRP, "", "Erasers").as_deref(), Some(DEFAULT));
    assert_eq!(bound(&stage, CUP_GRP, "", "Shafts").as_deref(), Some(DEFAULT));
    assert_eq!(bound(&stage, CUP_GRP, "", "").as_deref(), Some(DEFAULT));
}

#[test]
fn test_shaft_gets_collection_material() {
    let (_dir, stage) = open_office_set();

    assert_eq!(bound(&stage, SHAFT, "", "Shafts").as_deref(), Some(YELLOW_PAINT));
    assert_eq!(bound(&stage, SHAFT, "", "").as_deref(), Some(YELLOW_PAINT));
    // Filtering by the other collection falls back to the direct binding
    assert_eq!(bound(&stage, SHAFT, "", "Erasers").as_deref(), Some(DEFAULT));
}

#[test]
fn test_eraser_head_gets_collection_material() {
    let (_dir, stage) = open_office_set();

    assert_eq!(bound(&stage, ERASER_HEAD, "", "Erasers").as_deref(), Some(PINK_PEARL));
    assert_eq!(bound(&stage, ERASER_HEAD, "", "").as_deref(), Some(PINK_PEARL));
}

#[test]
fn test_purposes_fall_back_to_all_purpose() {
    let (_dir, stage) = open_office_set();

    for purpose in ["full", "preview", "allPurpose"] {
        assert_eq!(bound(&stage, SHAFT, purpose, "").as_deref(), Some(YELLOW_PAINT));
        assert_eq!(bound(&stage, CUP_GRP, purpose, "").as_deref(), Some(DEFAULT));
    }
}

#[test]
fn test_preview_binding_only_affects_preview() {
    let (_dir, mut stage) = open_office_set();
    stage
        .bind(&p(SHAFT), &p(PINK_PEARL), BindingStrength::WeakerThanDescendents, Purpose::Preview)
        .expect("Failed to bind");

    assert_eq!(bound(&stage, SHAFT, "preview", "").as_deref(), Some(PINK_PEARL));
    assert_eq!(bound(&stage, SHAFT, "full", "").as_deref(), Some(YELLOW_PAINT));
}

#[test]
fn test_strong_root_binding_overrides_collections() {
    let (_dir, mut stage) = open_office_set();
    stage
        .bind(&p("/Office_set"), &p(DEFAULT), BindingStrength::StrongerThanDescendents, Purpose::AllPurpose)
        .expect("Failed to bind");

    assert_eq!(bound(&stage, SHAFT, "", "").as_deref(), Some(DEFAULT));
    assert_eq!(bound(&stage, ERASER_HEAD, "", "").as_deref(), Some(DEFAULT));
}

#[test]
fn test_invalid_inputs() {
    let (_dir, stage) = open_office_set();

    let prim = stage.prim_at_path(&p(SHAFT));
    assert!(matches!(
        resolve_bound_material(&prim, "render", ""),
        Err(Error::InvalidPurpose { .. })
    ));

    let missing = stage.prim_at_path(&p("/Office_set/Nope"));
    assert!(matches!(resolve_bound_material(&missing, "", ""), Err(Error::InvalidNode(_))));
}

#[test]
fn test_batch_matches_single_resolution() {
    let (_dir, stage) = open_office_set();
    let resolver = BindingResolver::default();

    let prims: Vec<Prim<'_>> = stage
        .traverse()
        .iter()
        .map(|path| stage.prim_at_path(path))
        .collect();
    assert_eq!(prims.len(), stage.num_prims());

    for collection in ["", "Erasers", "Shafts"] {
        let batch = resolver.resolve_many(&prims, Purpose::Full, collection);
        for (prim, result) in prims.iter().zip(batch) {
            let single = resolver.resolve(prim, Purpose::Full, collection).expect("resolve failed");
            assert_eq!(result.expect("batch resolve failed"), single, "mismatch at {}", prim.path());
        }
    }
}

#[test]
fn test_settings_file_restricts_purposes() {
    let (dir, stage) = open_office_set();
    let settings_path = dir.path().join("settings.json");
    fs::write(&settings_path, r#"{ "allowedPurposes": ["preview", "allPurpose"] }"#)
        .expect("Failed to write settings");

    let settings = ResolverSettings::load(&settings_path).expect("Failed to load settings");
    let resolver = BindingResolver::new(settings);
    let prim = stage.prim_at_path(&p(SHAFT));

    match resolver.resolve_token(&prim, "full", "") {
        Err(Error::InvalidPurpose { purpose, allowed }) => {
            assert_eq!(purpose, "full");
            assert_eq!(allowed, vec!["preview", "allPurpose"]);
        }
        other => panic!("expected InvalidPurpose, got {other:?}"),
    }

    let material = resolver.resolve_token(&prim, "preview", "").expect("resolve failed");
    assert_eq!(material.map(|m| m.path().to_string()).as_deref(), Some(YELLOW_PAINT));
}

#[test]
fn test_bad_settings_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{ "allowedPurposes": ["render"] }"#).expect("Failed to write settings");

    assert!(matches!(ResolverSettings::load(&path), Err(Error::Json(_))));
}
