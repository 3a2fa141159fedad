//! Command implementations for arcade-cli

pub mod info;
pub mod launch;
pub mod list;
pub mod programs;
pub mod rules;
pub mod volumes;
pub mod watch;

pub use info::run_info;
pub use launch::run_launch;
pub use list::run_list;
pub use programs::run_programs;
pub use rules::run_rules;
pub use volumes::run_volumes;
pub use watch::run_watch;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use arcade_core::{CatalogService, EngineConfig};
    use arcade_test_utils::{RecordingLauncher, StaticVolumes, TestLibrary};

    /// A refreshed service over `lib` that records launches.
    pub fn service(lib: &TestLibrary) -> (CatalogService, Arc<RecordingLauncher>) {
        let launcher = Arc::new(RecordingLauncher::new());
        let service = CatalogService::builder(EngineConfig::for_root(lib.root()).unwrap())
            .volume_source(Arc::new(StaticVolumes::new()))
            .launcher(launcher.clone())
            .build()
            .unwrap();
        service.refresh_now().unwrap();
        (service, launcher)
    }
}
