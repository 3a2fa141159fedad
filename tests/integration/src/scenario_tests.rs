//! End-to-end catalog scenarios
//!
//! Each test builds a project root on disk, drives a `CatalogService` through
//! refresh cycles and checks the published index and launch outcomes.

use std::fs;
use std::sync::Arc;

use arcade_catalog::RootId;
use arcade_core::{CatalogService, EngineConfig, LaunchOutcome};
use arcade_fs::NormalizedPath;
use arcade_launch::{LaunchKind, ResolutionFailure};
use arcade_test_utils::{RecordingLauncher, StaticVolumes, TestLibrary};
use pretty_assertions::assert_eq;

struct Setup {
    lib: TestLibrary,
    volumes: Arc<StaticVolumes>,
    launcher: Arc<RecordingLauncher>,
    service: CatalogService,
}

fn setup() -> Setup {
    let lib = TestLibrary::new();
    let volumes = Arc::new(StaticVolumes::new());
    let launcher = Arc::new(RecordingLauncher::new());
    let service = CatalogService::builder(EngineConfig::for_root(lib.root()).unwrap())
        .volume_source(volumes.clone())
        .launcher(launcher.clone())
        .build()
        .unwrap();
    Setup {
        lib,
        volumes,
        launcher,
        service,
    }
}

fn file_names(service: &CatalogService) -> Vec<String> {
    service
        .current_index()
        .iter()
        .map(|(_, entry)| {
            entry
                .path
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

// ============================================================================
// Local library
// ============================================================================

#[test]
fn test_local_only_library() {
    let s = setup();
    s.lib.add_game("a.nes");
    s.lib.add_game("b.smc");
    s.lib.add_game("readme.txt");

    s.service.refresh_now().unwrap();

    assert_eq!(file_names(&s.service), vec!["a.nes", "b.smc"]);
    let index = s.service.current_index();
    assert_eq!(index.get(1).unwrap().system, "Nintendo Entertainment System");
    assert_eq!(index.get(2).unwrap().system, "Super Nintendo");
    assert!(index.iter().all(|(_, e)| e.source == RootId::Library));
}

#[test]
fn test_refresh_over_unchanged_tree_is_identical() {
    let s = setup();
    s.lib.add_game("a.nes");
    s.lib.add_game("sub/b.smc");

    s.service.refresh_now().unwrap();
    let first = s.service.current_index();
    let report = s.service.refresh_now().unwrap();

    assert!(!report.changed);
    assert!(Arc::ptr_eq(&first, &s.service.current_index()));

    // A fresh service over the same tree numbers it the same way.
    let other = CatalogService::builder(EngineConfig::for_root(s.lib.root()).unwrap())
        .volume_source(Arc::new(StaticVolumes::new()))
        .build()
        .unwrap();
    other.refresh_now().unwrap();
    assert!(other.current_index().same_entries(&first));
}

#[test]
fn test_touched_file_recatalogs_root() {
    let s = setup();
    let game = s.lib.add_game("a.nes");
    let before = s.service.refresh_now().unwrap().generation;

    s.lib.touch(&game, 120);
    let report = s.service.refresh_now().unwrap();
    assert_eq!(report.rescanned, vec![RootId::Library]);
    // Same entries, so the numbering generation stays.
    assert!(!report.changed);
    assert_eq!(report.generation, before);
}

// ============================================================================
// Removable volumes
// ============================================================================

#[test]
fn test_volume_appears_and_disappears() {
    let s = setup();
    s.lib.add_game("a.nes");
    s.lib.add_game("b.smc");
    let usb = s.lib.add_volume("usb");
    s.lib.add_volume_game(&usb, "c.gba");
    s.lib.add_volume_game(&usb, "d.gb");
    s.lib.add_volume_game(&usb, "roms/e.nds");

    s.service.refresh_now().unwrap();
    assert_eq!(s.service.current_index().len(), 2);

    s.volumes.attach(&usb);
    s.service.refresh_now().unwrap();
    let index = s.service.current_index();
    assert_eq!(index.len(), 5);
    let numbers: Vec<usize> = index.iter().map(|(n, _)| n).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    assert_eq!(file_names(&s.service), vec!["a.nes", "b.smc", "c.gba", "d.gb", "e.nds"]);
    assert_eq!(
        index.get(5).unwrap().source,
        RootId::Volume(NormalizedPath::new(&usb))
    );

    s.volumes.detach(&usb);
    s.service.refresh_now().unwrap();
    assert_eq!(file_names(&s.service), vec!["a.nes", "b.smc"]);
    assert!(s.service.volumes_snapshot().is_empty());
}

#[test]
fn test_volumes_numbered_in_mount_order() {
    let s = setup();
    s.lib.add_game("z.nes");
    let beta = s.lib.add_volume("beta");
    let alpha = s.lib.add_volume("alpha");
    s.lib.add_volume_game(&beta, "a.nes");
    s.lib.add_volume_game(&alpha, "b.nes");
    s.volumes.attach(&beta);
    s.volumes.attach(&alpha);

    s.service.refresh_now().unwrap();
    // Library first, then volumes by mount path.
    assert_eq!(file_names(&s.service), vec!["z.nes", "b.nes", "a.nes"]);
}

#[test]
fn test_vanished_volume_leaves_other_roots() {
    let s = setup();
    s.lib.add_game("a.nes");
    let usb = s.lib.add_volume("usb");
    s.lib.add_volume_game(&usb, "b.nes");
    s.volumes.attach(&usb);
    s.service.refresh_now().unwrap();
    assert_eq!(s.service.current_index().len(), 2);

    // Pulled without the watcher noticing yet
    fs::remove_dir_all(&usb).unwrap();
    let report = s.service.refresh_now().unwrap();

    assert_eq!(file_names(&s.service), vec!["a.nes"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.reused, vec![RootId::Library]);
}

// ============================================================================
// Unreadable content
// ============================================================================

#[cfg(unix)]
#[test]
fn test_dangling_link_in_volume_is_skipped() {
    let s = setup();
    s.lib.add_game("a.nes");
    let usb = s.lib.add_volume("usb");
    s.lib.add_volume_game(&usb, "b.smc");
    std::os::unix::fs::symlink(usb.join("missing"), usb.join("saves")).unwrap();
    s.volumes.attach(&usb);

    let report = s.service.refresh_now().unwrap();
    assert!(report.failed.is_empty());
    assert_eq!(file_names(&s.service), vec!["a.nes", "b.smc"]);
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_leaves_other_roots() {
    use std::os::unix::fs::PermissionsExt;

    let s = setup();
    s.lib.add_game("a.nes");
    let usb = s.lib.add_volume("usb");
    s.lib.add_volume_game(&usb, "b.smc");
    s.lib.add_volume_game(&usb, "locked/c.smc");
    let locked = usb.join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    s.volumes.attach(&usb);

    let report = s.service.refresh_now();
    let readable_anyway = fs::read_dir(&locked).is_ok();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let report = report.unwrap();

    assert!(report.failed.is_empty());
    let names = file_names(&s.service);
    assert_eq!(&names[..2], &["a.nes".to_string(), "b.smc".to_string()]);
    if !readable_anyway {
        // Privileged users can read the directory regardless of its mode.
        assert_eq!(names.len(), 2);
        let snapshot = s.service.snapshot();
        let volume = &snapshot.roots[&RootId::Volume(NormalizedPath::new(&usb))];
        assert_eq!(volume.snapshot.skipped().len(), 1);
    }
}

// ============================================================================
// Launching
// ============================================================================

#[test]
fn test_missing_program_fails_resolution_only() {
    let s = setup();
    s.lib.add_game("a.gba");
    s.service.refresh_now().unwrap();
    let before = s.service.current_index();

    let outcome = s.service.resolve_and_launch(1);
    assert!(matches!(
        outcome,
        LaunchOutcome::ResolutionFailed {
            failure: ResolutionFailure::NoViableLauncher { .. },
            ..
        }
    ));
    assert!(s.launcher.launches().is_empty());
    assert!(Arc::ptr_eq(&before, &s.service.current_index()));
    assert!(!before.get(1).unwrap().runnable);
}

#[test]
fn test_primary_program_beats_runner() {
    let s = setup();
    s.lib.add_game("a.smc");
    s.lib.install_program("snes9x");
    s.lib.install_program("retroarch");
    s.lib.install_artifact("snes9x_libretro");
    s.service.refresh_now().unwrap();

    let LaunchOutcome::Started { launch, .. } = s.service.resolve_and_launch(1) else {
        panic!("expected a launch");
    };
    assert_eq!(launch.kind, LaunchKind::Primary);
    assert_eq!(launch.label, "Snes9x");
}

#[test]
fn test_runner_needs_artifact() {
    let s = setup();
    s.lib.add_game("a.smc");
    s.lib.install_program("retroarch");
    s.service.refresh_now().unwrap();
    assert!(!s.service.resolve_and_launch(1).is_started());

    s.lib.install_artifact("snes9x_libretro");
    s.service.refresh_now().unwrap();
    let LaunchOutcome::Started { launch, .. } = s.service.resolve_and_launch(1) else {
        panic!("expected a launch");
    };
    assert_eq!(launch.kind, LaunchKind::SecondaryRunner);
    assert_eq!(s.launcher.launches().len(), 1);
}

#[test]
fn test_self_executing_entry() {
    let s = setup();
    let game = s.lib.add_game("Doom/doom.exe");
    s.service.refresh_now().unwrap();

    let LaunchOutcome::Started { launch, .. } = s.service.resolve_and_launch(1) else {
        panic!("expected a launch");
    };
    assert_eq!(launch.kind, LaunchKind::SelfExecuting);
    assert_eq!(launch.argv, vec![game.to_string_lossy().into_owned()]);
}

#[test]
fn test_numbers_shift_after_rebuild() {
    let s = setup();
    s.lib.add_game("b.smc");
    s.lib.install_program("snes9x");
    s.service.refresh_now().unwrap();
    let generation = s.service.current_index().generation();

    s.lib.add_game("a.smc");
    s.service.refresh_now().unwrap();

    // Number 1 now refers to a different file; the tagged request refuses.
    assert!(matches!(
        s.service.resolve_and_launch_in(generation, 1),
        LaunchOutcome::StaleIndex { .. }
    ));
    let LaunchOutcome::Started { entry, .. } = s.service.resolve_and_launch(1) else {
        panic!("expected a launch");
    };
    assert_eq!(entry.display_name, "a");
}
