//! Publication and scheduling behaviour under concurrent use

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use arcade_core::{CatalogService, EngineConfig, ServiceState, ShutdownReport};
use arcade_test_utils::{RecordingLauncher, StaticVolumes, TestLibrary};

const WAIT: Duration = Duration::from_secs(10);
/// Long enough that only stop or a forced refresh wakes the worker
const IDLE: Duration = Duration::from_secs(3600);

fn service(lib: &TestLibrary, volumes: Arc<StaticVolumes>, interval: Duration) -> CatalogService {
    let mut config = EngineConfig::for_root(lib.root()).unwrap();
    config.stop_timeout_secs = 10;
    CatalogService::builder(config)
        .scan_interval(interval)
        .volume_source(volumes)
        .launcher(Arc::new(RecordingLauncher::new()))
        .build()
        .unwrap()
}

#[test]
fn test_readers_see_whole_snapshots() {
    let lib = TestLibrary::new();
    lib.add_game("a.nes");
    lib.add_game("b.smc");
    let usb = lib.add_volume("usb");
    for name in ["c.gba", "d.gb", "e.nds"] {
        lib.add_volume_game(&usb, name);
    }
    let volumes = Arc::new(StaticVolumes::new());
    let service = service(&lib, volumes.clone(), IDLE);
    let local_only = service.refresh_now().unwrap().generation;

    let done = AtomicBool::new(false);
    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                while !done.load(Ordering::Relaxed) {
                    let snapshot = service.snapshot();
                    let index = &snapshot.index;
                    match index.len() {
                        2 => assert!(snapshot.volumes.is_empty()),
                        5 => assert_eq!(snapshot.volumes.len(), 1),
                        n => panic!("observed a partial index of {n} entries"),
                    }
                    let numbers: Vec<usize> = index.iter().map(|(n, _)| n).collect();
                    assert_eq!(numbers, (1..=index.len()).collect::<Vec<_>>());
                    assert_eq!(snapshot.generation, index.generation());
                }
            });
        }

        for round in 0..20 {
            if round % 2 == 0 {
                volumes.attach(&usb);
            } else {
                volumes.detach(&usb);
            }
            service.refresh_now().unwrap();
        }
        done.store(true, Ordering::Relaxed);
    });

    assert_eq!(service.current_index().len(), 2);
    assert_eq!(service.current_index().generation(), local_only);
    assert_eq!(service.cycles_completed(), 21);
}

#[test]
fn test_worker_start_and_stop() {
    let lib = TestLibrary::new();
    lib.add_game("a.nes");
    let service = service(&lib, Arc::new(StaticVolumes::new()), IDLE);

    service.start().unwrap();
    assert!(service.wait_for_cycle(0, WAIT).is_some());
    assert_eq!(service.current_index().len(), 1);

    // The worker sleeps for an hour; stop must wake it.
    let started = Instant::now();
    assert_eq!(service.stop(), ShutdownReport::Clean);
    assert!(started.elapsed() < WAIT);
    assert_eq!(service.state(), ServiceState::Stopped);
}

#[test]
fn test_force_refresh_requests_coalesce() {
    let lib = TestLibrary::new();
    lib.add_game("a.nes");
    let service = service(&lib, Arc::new(StaticVolumes::new()), IDLE);

    service.start().unwrap();
    let base = service.wait_for_cycle(0, WAIT).unwrap();

    lib.add_game("b.nes");
    for _ in 0..10 {
        service.force_refresh();
    }
    assert!(service.wait_for_cycle(base, WAIT).is_some());
    thread::sleep(Duration::from_millis(300));

    let cycles = service.cycles_completed();
    assert!(cycles <= base + 2, "{} forced refreshes ran {} cycles", 10, cycles - base);
    assert_eq!(service.current_index().len(), 2);
    assert_eq!(service.stop(), ShutdownReport::Clean);
}

#[test]
fn test_timer_drives_refresh() {
    let lib = TestLibrary::new();
    let service = service(&lib, Arc::new(StaticVolumes::new()), Duration::from_millis(50));

    service.start().unwrap();
    let first = service.wait_for_cycle(0, WAIT).unwrap();
    lib.add_game("a.nes");
    // No force: the interval picks the file up.
    assert!(service.wait_for_cycle(first, WAIT).is_some());
    let deadline = Instant::now() + WAIT;
    while service.current_index().is_empty() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(50));
    }
    assert_eq!(service.current_index().len(), 1);
    assert_eq!(service.stop(), ShutdownReport::Clean);
}

#[test]
fn test_refresh_now_while_worker_runs() {
    let lib = TestLibrary::new();
    lib.add_game("a.nes");
    let service = service(&lib, Arc::new(StaticVolumes::new()), IDLE);
    service.start().unwrap();

    thread::scope(|scope| {
        for _ in 0..3 {
            scope.spawn(|| {
                for _ in 0..5 {
                    service.refresh_now().unwrap();
                }
            });
        }
    });

    assert!(service.cycles_completed() >= 15);
    assert_eq!(service.current_index().len(), 1);
    assert!(!service.snapshot().roots.is_empty());
    assert_eq!(service.stop(), ShutdownReport::Clean);
}
