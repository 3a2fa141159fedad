//! Removable volume detection
//!
//! Mount enumeration is platform specific and sits behind [`MountSource`];
//! the filtering (removable heuristics, capacity threshold, deduplication by
//! canonical mount path) is shared and lives in [`VolumeWatcher`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::NormalizedPath;

/// Filesystem types that never represent user media
const PSEUDO_FILESYSTEMS: &[&str] = &[
    "proc", "sysfs", "tmpfs", "devtmpfs", "devpts", "cgroup", "cgroup2", "overlay", "squashfs",
    "autofs", "mqueue", "debugfs", "tracefs", "securityfs", "pstore", "bpf", "fusectl",
    "configfs", "hugetlbfs", "binfmt_misc", "nsfs", "ramfs", "efivarfs",
];

/// A detected removable volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    /// Canonical mount path, also the volume's identifier
    pub mount_path: NormalizedPath,
    /// Total capacity in bytes
    pub total_bytes: u64,
    /// Free capacity in bytes
    pub free_bytes: u64,
}

/// A mount reported by the operating system, before any filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    pub device: String,
    pub path: PathBuf,
    pub fs_type: String,
    pub options: Vec<String>,
}

impl MountPoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            device: String::new(),
            path: path.into(),
            fs_type: String::new(),
            options: Vec::new(),
        }
    }

    fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// Enumerates mounts known to the operating system.
pub trait MountSource: Send + Sync {
    fn mounts(&self) -> Vec<MountPoint>;
}

/// Anything that can report the currently attached volumes.
///
/// Implemented by [`VolumeWatcher`]; tests substitute a fixed list.
pub trait VolumeSource: Send + Sync {
    fn list_volumes(&self) -> Vec<Volume>;
}

/// Filtering settings for [`VolumeWatcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeWatcherConfig {
    /// Volumes with less total capacity are ignored
    pub min_capacity_bytes: u64,
    /// Mount points below these prefixes count as removable
    pub mount_prefixes: Vec<String>,
}

impl Default for VolumeWatcherConfig {
    fn default() -> Self {
        Self {
            min_capacity_bytes: 100 * 1024 * 1024,
            mount_prefixes: ["/media", "/mnt", "/Volumes", "/run/media"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Detects attached removable volumes.
#[derive(Debug)]
pub struct VolumeWatcher<M = SystemMounts> {
    source: M,
    config: VolumeWatcherConfig,
}

impl VolumeWatcher<SystemMounts> {
    /// Watcher over the operating system's mount table
    pub fn system(config: VolumeWatcherConfig) -> Self {
        Self::new(SystemMounts, config)
    }
}

impl<M: MountSource> VolumeWatcher<M> {
    pub fn new(source: M, config: VolumeWatcherConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &VolumeWatcherConfig {
        &self.config
    }

    /// Currently attached volumes, deduplicated and sorted by mount path.
    pub fn list_volumes(&self) -> Vec<Volume> {
        let mut volumes = BTreeMap::new();

        for mount in self.source.mounts() {
            if !is_removable(&mount, &self.config.mount_prefixes) {
                continue;
            }

            let canonical = match dunce::canonicalize(&mount.path) {
                Ok(path) => path,
                Err(e) => {
                    debug!(mount = %mount.path.display(), error = %e, "mount point not accessible");
                    continue;
                }
            };
            if canonical.parent().is_none() {
                // An alias of the filesystem root (e.g. the boot volume under /Volumes)
                continue;
            }

            let id = NormalizedPath::new(&canonical);
            if volumes.contains_key(&id) {
                continue;
            }

            let total_bytes = match fs2::total_space(&canonical) {
                Ok(total) => total,
                Err(e) => {
                    warn!(mount = %id, error = %e, "could not read volume capacity");
                    continue;
                }
            };
            if total_bytes < self.config.min_capacity_bytes {
                debug!(mount = %id, total_bytes, "skipping small volume");
                continue;
            }
            let free_bytes = fs2::free_space(&canonical).unwrap_or(0);

            debug!(mount = %id, total_bytes, free_bytes, "detected removable volume");
            volumes.insert(
                id.clone(),
                Volume {
                    mount_path: id,
                    total_bytes,
                    free_bytes,
                },
            );
        }

        volumes.into_values().collect()
    }
}

impl<M: MountSource> VolumeSource for VolumeWatcher<M> {
    fn list_volumes(&self) -> Vec<Volume> {
        VolumeWatcher::list_volumes(self)
    }
}

/// Decide whether a mount looks like removable user media.
///
/// - pseudo filesystems never qualify
/// - an explicit `removable` option qualifies unless it is an optical drive
/// - mount points under one of `prefixes` qualify
/// - block devices mounted `rw,nosuid` outside `/` qualify (the usual shape of
///   desktop automounts)
pub fn is_removable(mount: &MountPoint, prefixes: &[String]) -> bool {
    if PSEUDO_FILESYSTEMS.contains(&mount.fs_type.as_str()) {
        return false;
    }
    if mount.has_option("cdrom") {
        return false;
    }
    if mount.has_option("removable") {
        return true;
    }

    let path = NormalizedPath::new(&mount.path);
    let under_prefix = prefixes
        .iter()
        .any(|prefix| path.starts_with(prefix) && path != NormalizedPath::new(prefix));
    if under_prefix {
        return true;
    }

    mount.device.starts_with("/dev/")
        && path.as_str() != "/"
        && mount.has_option("rw")
        && mount.has_option("nosuid")
}

/// Parse the Linux `/proc/self/mounts` table.
pub fn parse_proc_mounts(content: &str) -> Vec<MountPoint> {
    content
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let device = fields.next()?;
            let path = fields.next()?;
            let fs_type = fields.next()?;
            let options = fields.next().unwrap_or("");
            Some(MountPoint {
                device: unescape_mount_field(device),
                path: PathBuf::from(unescape_mount_field(path)),
                fs_type: fs_type.to_string(),
                options: options.split(',').map(String::from).collect(),
            })
        })
        .collect()
}

/// Undo the octal escaping (`\040` for space) used in the mount table.
fn unescape_mount_field(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() {
            let digits = &bytes[i + 1..i + 4];
            if digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
                let value = digits
                    .iter()
                    .fold(0u16, |acc, b| acc * 8 + u16::from(b - b'0'));
                if let Ok(value) = u8::try_from(value) {
                    out.push(value);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Mount table of the running operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemMounts;

impl MountSource for SystemMounts {
    #[cfg(target_os = "linux")]
    fn mounts(&self) -> Vec<MountPoint> {
        match std::fs::read_to_string("/proc/self/mounts") {
            Ok(content) => parse_proc_mounts(&content),
            Err(e) => {
                warn!(error = %e, "could not read mount table");
                Vec::new()
            }
        }
    }

    #[cfg(target_os = "macos")]
    fn mounts(&self) -> Vec<MountPoint> {
        list_children(Path::new("/Volumes"))
    }

    #[cfg(windows)]
    fn mounts(&self) -> Vec<MountPoint> {
        (b'A'..=b'Z')
            .filter_map(|letter| {
                let root = format!("{}:\\", letter as char);
                let options = drive_options(drive_type(&root))?;
                Path::new(&root).exists().then(|| MountPoint {
                    device: root[..2].to_string(),
                    path: PathBuf::from(&root),
                    fs_type: String::new(),
                    options,
                })
            })
            .collect()
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
    fn mounts(&self) -> Vec<MountPoint> {
        ["/media", "/mnt"]
            .iter()
            .flat_map(|dir| list_children(Path::new(dir)))
            .collect()
    }
}

// `GetDriveTypeW` results (WinBase.h)
const DRIVE_UNKNOWN: u32 = 0;
const DRIVE_NO_ROOT_DIR: u32 = 1;
const DRIVE_REMOVABLE: u32 = 2;
const DRIVE_CDROM: u32 = 5;

/// Mount options for a Windows drive root of the given drive type, or
/// `None` when nothing is mounted there. Network, RAM and internal disks
/// are all reported as `fixed`.
#[cfg_attr(not(windows), allow(dead_code))]
fn drive_options(drive_type: u32) -> Option<Vec<String>> {
    let kind = match drive_type {
        DRIVE_UNKNOWN | DRIVE_NO_ROOT_DIR => return None,
        DRIVE_REMOVABLE => "removable",
        DRIVE_CDROM => "cdrom",
        _ => "fixed",
    };
    Some(vec!["rw".to_string(), kind.to_string()])
}

#[cfg(windows)]
fn drive_type(root: &str) -> u32 {
    use windows_sys::Win32::Storage::FileSystem::GetDriveTypeW;

    let wide: Vec<u16> = root.encode_utf16().chain(std::iter::once(0)).collect();
    // SAFETY: `wide` is NUL-terminated and outlives the call.
    unsafe { GetDriveTypeW(wide.as_ptr()) }
}

/// Treat each child directory of `dir` as a mount point.
#[cfg_attr(any(target_os = "linux", windows), allow(dead_code))]
fn list_children(dir: &Path) -> Vec<MountPoint> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .map(MountPoint::new)
        .collect()
}
