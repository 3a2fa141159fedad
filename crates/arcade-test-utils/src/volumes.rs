//! [`StaticVolumes`]: a volume source tests attach and detach by hand.

use std::path::Path;

use arcade_fs::{NormalizedPath, Volume, VolumeSource};
use parking_lot::Mutex;

const GIB: u64 = 1024 * 1024 * 1024;

/// Volume source backed by an in-memory list.
#[derive(Debug, Default)]
pub struct StaticVolumes {
    volumes: Mutex<Vec<Volume>>,
}

impl StaticVolumes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `path` as an attached 1 GiB volume.
    pub fn attach(&self, path: &Path) {
        let mount_path = NormalizedPath::new(path);
        let mut volumes = self.volumes.lock();
        volumes.retain(|v| v.mount_path != mount_path);
        volumes.push(Volume {
            mount_path,
            total_bytes: GIB,
            free_bytes: GIB / 2,
        });
        volumes.sort_by(|a, b| a.mount_path.cmp(&b.mount_path));
    }

    /// Stop reporting `path`.
    pub fn detach(&self, path: &Path) {
        let mount_path = NormalizedPath::new(path);
        self.volumes.lock().retain(|v| v.mount_path != mount_path);
    }
}

impl VolumeSource for StaticVolumes {
    fn list_volumes(&self) -> Vec<Volume> {
        self.volumes.lock().clone()
    }
}
