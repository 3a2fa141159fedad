//! The catalog service
//!
//! Owns the published [`CatalogSnapshot`] and the background worker that
//! refreshes it.
//!
//! - `published` is the single lock around the published state. Readers hold
//!   it only long enough to clone an `Arc`; the worker builds the next
//!   snapshot outside it and swaps it in.
//! - `cycle_lock` serializes cycles so a synchronous `refresh_now` never
//!   interleaves with the worker.
//! - `control` carries the stop and force-refresh signals, the scheduler
//!   state and the completed-cycle counter.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use arcade_catalog::{Cataloger, Index};
use arcade_fs::{Volume, VolumeSource, VolumeWatcher};
use arcade_launch::{InstalledPrograms, Launcher, ProcessLauncher, Resolver};
use arcade_rules::{LoadReport, RuleLoader, RuleTable};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, info, warn};

use crate::config::EngineConfig;
use crate::cycle::{self, CycleInputs};
use crate::outcome::{EntryDescription, LaunchOutcome};
use crate::state::{CatalogSnapshot, CycleReport, ServiceState, ShutdownReport};
use crate::{Error, Result};

struct Control {
    state: ServiceState,
    stop: bool,
    force_pending: bool,
    worker_finished: bool,
    cycles: u64,
}

struct Shared {
    config: EngineConfig,
    interval: Duration,
    rules: RuleTable,
    rule_report: LoadReport,
    cataloger: Cataloger,
    volumes: Arc<dyn VolumeSource>,
    launcher: Arc<dyn Launcher>,
    published: Mutex<Arc<CatalogSnapshot>>,
    cycle_lock: Mutex<()>,
    control: Mutex<Control>,
    /// Wakes the worker (stop, force refresh)
    wake: Condvar,
    /// Signals completed cycles and worker exit
    cycle_done: Condvar,
}

/// Builder for [`CatalogService`].
pub struct CatalogServiceBuilder {
    config: EngineConfig,
    rules: Option<RuleTable>,
    volumes: Option<Arc<dyn VolumeSource>>,
    launcher: Option<Arc<dyn Launcher>>,
    interval: Option<Duration>,
}

impl CatalogServiceBuilder {
    /// Use this rule table instead of loading built-ins plus `rules_file`.
    pub fn rules(mut self, rules: RuleTable) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Use this volume source instead of the system mount table.
    pub fn volume_source(mut self, volumes: Arc<dyn VolumeSource>) -> Self {
        self.volumes = Some(volumes);
        self
    }

    /// Use this launcher instead of spawning processes.
    pub fn launcher(mut self, launcher: Arc<dyn Launcher>) -> Self {
        self.launcher = Some(launcher);
        self
    }

    /// Refresh on this interval instead of `scan_interval_secs`.
    pub fn scan_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn build(self) -> Result<CatalogService> {
        let (rules, rule_report) = match self.rules {
            Some(rules) => (rules, LoadReport::default()),
            None => RuleLoader::new().load_table(self.config.rules_file.as_deref())?,
        };
        if !rule_report.is_clean() {
            warn!(
                path = %rule_report.source.display(),
                rejected = rule_report.errors.len(),
                "some rules were excluded"
            );
        }

        let volumes = self.volumes.unwrap_or_else(|| {
            Arc::new(VolumeWatcher::system(self.config.volume_watcher_config()))
        });
        let launcher = self
            .launcher
            .unwrap_or_else(|| Arc::new(ProcessLauncher::new()));
        let cataloger = Cataloger::new(self.config.catalog.metadata_suffixes.iter().cloned());
        let interval = self
            .interval
            .unwrap_or_else(|| self.config.scan_interval());

        Ok(CatalogService {
            shared: Arc::new(Shared {
                config: self.config,
                interval,
                rules,
                rule_report,
                cataloger,
                volumes,
                launcher,
                published: Mutex::new(Arc::new(CatalogSnapshot::initial())),
                cycle_lock: Mutex::new(()),
                control: Mutex::new(Control {
                    state: ServiceState::Idle,
                    stop: false,
                    force_pending: false,
                    worker_finished: false,
                    cycles: 0,
                }),
                wake: Condvar::new(),
                cycle_done: Condvar::new(),
            }),
            worker: Mutex::new(None),
        })
    }
}

/// Background-refreshed media catalog.
///
/// Construct, `start`, query from any thread, `stop`. Without `start` the
/// service still answers queries and refreshes on `refresh_now`.
pub struct CatalogService {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl CatalogService {
    /// Service with built-in rules plus the configured rules file, the
    /// system volume watcher and the process launcher.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: EngineConfig) -> CatalogServiceBuilder {
        CatalogServiceBuilder {
            config,
            rules: None,
            volumes: None,
            launcher: None,
            interval: None,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    /// Get the rule table
    pub fn rules(&self) -> &RuleTable {
        &self.shared.rules
    }

    /// Get the report of the rules file load
    pub fn rule_report(&self) -> &LoadReport {
        &self.shared.rule_report
    }

    /// Start the background worker. The first cycle runs immediately.
    pub fn start(&self) -> Result<()> {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return Err(Error::AlreadyStarted);
        }
        if self.shared.control.lock().stop {
            return Err(Error::Stopped);
        }

        let shared = Arc::clone(&self.shared);
        let handle = std::thread::Builder::new()
            .name("arcade-catalog".to_string())
            .spawn(move || worker_loop(&shared))?;
        *worker = Some(handle);

        info!(
            interval_ms = self.shared.interval.as_millis() as u64,
            library = %self.shared.config.library_root.display(),
            "catalog service started"
        );
        Ok(())
    }

    /// Signal the worker to stop and wait up to the configured timeout.
    ///
    /// A cycle in progress is allowed to finish. When the worker does not
    /// finish in time the service is still marked stopping and the worker
    /// exits on its own after its cycle.
    pub fn stop(&self) -> ShutdownReport {
        let handle = self.worker.lock().take();
        let timeout = self.shared.config.stop_timeout();

        let mut control = self.shared.control.lock();
        control.stop = true;
        let Some(handle) = handle else {
            control.state = ServiceState::Stopped;
            return ShutdownReport::NotRunning;
        };
        if control.state != ServiceState::Stopped {
            control.state = ServiceState::Stopping;
        }
        self.shared.wake.notify_all();

        let started = Instant::now();
        let deadline = started + timeout;
        while !control.worker_finished {
            if self
                .shared
                .cycle_done
                .wait_until(&mut control, deadline)
                .timed_out()
            {
                break;
            }
        }

        if control.worker_finished {
            drop(control);
            if handle.join().is_err() {
                error!("catalog worker panicked during shutdown");
            }
            info!("catalog service stopped");
            ShutdownReport::Clean
        } else {
            let waited = started.elapsed();
            warn!(waited_ms = waited.as_millis() as u64, "catalog worker did not stop in time");
            ShutdownReport::TimedOut { waited }
        }
    }

    /// Ask for a refresh as soon as possible.
    ///
    /// Requests made while a cycle runs coalesce into one extra cycle.
    pub fn force_refresh(&self) {
        let mut control = self.shared.control.lock();
        control.force_pending = true;
        self.shared.wake.notify_all();
        debug!("refresh requested");
    }

    /// Run one cycle on the calling thread and publish it.
    pub fn refresh_now(&self) -> Result<CycleReport> {
        run_guarded(&self.shared)
    }

    /// The currently published index
    pub fn current_index(&self) -> Arc<Index> {
        Arc::clone(&self.shared.published.lock().index)
    }

    /// The currently published snapshot
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&self.shared.published.lock())
    }

    /// Volumes seen by the last cycle
    pub fn volumes_snapshot(&self) -> Vec<Volume> {
        self.snapshot().volumes.clone()
    }

    /// Scheduler state
    pub fn state(&self) -> ServiceState {
        self.shared.control.lock().state
    }

    /// Number of cycles published so far
    pub fn cycles_completed(&self) -> u64 {
        self.shared.control.lock().cycles
    }

    /// Block until more than `after` cycles have been published.
    ///
    /// Returns the new cycle count, or `None` on timeout.
    pub fn wait_for_cycle(&self, after: u64, timeout: Duration) -> Option<u64> {
        let deadline = Instant::now() + timeout;
        let mut control = self.shared.control.lock();
        while control.cycles <= after {
            if self
                .shared
                .cycle_done
                .wait_until(&mut control, deadline)
                .timed_out()
            {
                return (control.cycles > after).then_some(control.cycles);
            }
        }
        Some(control.cycles)
    }

    /// Programs and artifacts installed right now
    pub fn installed_programs(&self) -> InstalledPrograms {
        InstalledPrograms::discover(
            &self.shared.config.programs_dir,
            &self.shared.config.artifacts_dir,
        )
    }

    /// Resolve and launch entry `number` of the current index.
    pub fn resolve_and_launch(&self, number: usize) -> LaunchOutcome {
        let index = self.current_index();
        self.launch_from(&index, number)
    }

    /// Like [`resolve_and_launch`](Self::resolve_and_launch), but only when
    /// the current index still has `generation`.
    pub fn resolve_and_launch_in(&self, generation: u64, number: usize) -> LaunchOutcome {
        let index = self.current_index();
        if index.generation() != generation {
            return LaunchOutcome::StaleIndex {
                requested: generation,
                current: index.generation(),
            };
        }
        self.launch_from(&index, number)
    }

    /// Look up entry `number` and preview its resolution without launching.
    pub fn describe(&self, number: usize) -> Option<EntryDescription> {
        let index = self.current_index();
        let entry = Arc::clone(index.get(number)?);
        let installed = self.installed_programs();
        let resolution = Resolver::new(&self.shared.rules, &installed).resolve(&entry);
        Some(EntryDescription {
            number,
            generation: index.generation(),
            rule: self.shared.rules.get(&entry.extension).cloned(),
            entry,
            resolution,
        })
    }

    fn launch_from(&self, index: &Index, number: usize) -> LaunchOutcome {
        let Some(entry) = index.get(number).cloned() else {
            return LaunchOutcome::UnknownNumber {
                number,
                available: index.len(),
            };
        };

        let installed = self.installed_programs();
        let launch = match Resolver::new(&self.shared.rules, &installed).resolve(&entry) {
            Ok(launch) => launch,
            Err(failure) => {
                info!(number, path = %entry.path.display(), %failure, "cannot launch");
                return LaunchOutcome::ResolutionFailed { entry, failure };
            }
        };

        match self.shared.launcher.launch(&launch) {
            Ok(receipt) => LaunchOutcome::Started {
                entry,
                launch,
                receipt,
            },
            Err(error) => {
                warn!(number, command = %launch.command, %error, "launch failed");
                LaunchOutcome::LaunchFailed {
                    entry,
                    launch,
                    error,
                }
            }
        }
    }
}

impl Drop for CatalogService {
    fn drop(&mut self) {
        let mut control = self.shared.control.lock();
        control.stop = true;
        self.shared.wake.notify_all();
    }
}

fn set_state(shared: &Shared, state: ServiceState) {
    let mut control = shared.control.lock();
    if !matches!(control.state, ServiceState::Stopping | ServiceState::Stopped) {
        control.state = state;
    }
}

/// Run one cycle with panics contained. The previous snapshot stays
/// published if the cycle fails.
fn run_guarded(shared: &Shared) -> Result<CycleReport> {
    let _cycle = shared.cycle_lock.lock();
    set_state(shared, ServiceState::Scanning);

    let result = catch_unwind(AssertUnwindSafe(|| {
        let prev = Arc::clone(&shared.published.lock());
        let inputs = CycleInputs {
            config: &shared.config,
            rules: &shared.rules,
            cataloger: &shared.cataloger,
            volumes: shared.volumes.as_ref(),
        };
        let (next, report) = cycle::run(&inputs, &prev);

        set_state(shared, ServiceState::Publishing);
        *shared.published.lock() = Arc::new(next);
        report
    }));

    let mut control = shared.control.lock();
    if !matches!(control.state, ServiceState::Stopping | ServiceState::Stopped) {
        control.state = ServiceState::Idle;
    }
    match result {
        Ok(report) => {
            control.cycles += 1;
            shared.cycle_done.notify_all();
            Ok(report)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(%message, "refresh cycle panicked, keeping previous snapshot");
            Err(Error::CyclePanicked { message })
        }
    }
}

fn worker_loop(shared: &Shared) {
    let interval = shared.interval;
    loop {
        {
            let mut control = shared.control.lock();
            if control.stop {
                break;
            }
            control.force_pending = false;
        }

        // Failures are logged inside; the worker keeps going.
        let _ = run_guarded(shared);

        let mut control = shared.control.lock();
        let deadline = Instant::now() + interval;
        while !control.stop && !control.force_pending {
            if shared.wake.wait_until(&mut control, deadline).timed_out() {
                break;
            }
        }
        if control.stop {
            break;
        }
    }

    let mut control = shared.control.lock();
    control.state = ServiceState::Stopped;
    control.worker_finished = true;
    shared.cycle_done.notify_all();
    debug!("catalog worker exited");
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
