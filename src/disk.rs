//! Disk utilization of the volume holding a path.

use std::io;
use std::path::Path;

use janitor_evict::{percent_of, DiskSnapshot};

/// Byte counters for one volume, as reported by `statvfs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    pub total: u64,
    pub used: u64,
    /// Available to unprivileged users
    pub free: u64,
}

impl DiskUsage {
    pub fn percent_used(&self) -> f64 {
        percent_of(self.used, self.total)
    }

    pub fn snapshot(&self) -> DiskSnapshot {
        DiskSnapshot::new(self.total, self.used)
    }
}

/// Source of disk usage numbers.
pub trait DiskProbe {
    fn usage(&self, path: &Path) -> io::Result<DiskUsage>;
}

/// Reads the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatvfsProbe;

impl DiskProbe for StatvfsProbe {
    fn usage(&self, path: &Path) -> io::Result<DiskUsage> {
        disk_usage(path)
    }
}

/// A probe that always reports the same numbers.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub DiskUsage);

impl DiskProbe for FixedProbe {
    fn usage(&self, _path: &Path) -> io::Result<DiskUsage> {
        Ok(self.0)
    }
}

/// Query the volume containing `path`.
#[cfg(unix)]
pub fn disk_usage(path: &Path) -> io::Result<DiskUsage> {
    use std::ffi::CString;
    use std::mem::MaybeUninit;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let mut stat = MaybeUninit::<libc::statvfs>::uninit();
    // SAFETY: c_path is NUL terminated and stat is only read after success.
    let ret = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
    if ret != 0 {
        return Err(io::Error::last_os_error());
    }
    let stat = unsafe { stat.assume_init() };

    let fragment = stat.f_frsize as u64;
    let total = stat.f_blocks as u64 * fragment;
    let free = stat.f_bavail as u64 * fragment;
    let used = (stat.f_blocks as u64).saturating_sub(stat.f_bfree as u64) * fragment;
    Ok(DiskUsage { total, used, free })
}

#[cfg(not(unix))]
pub fn disk_usage(_path: &Path) -> io::Result<DiskUsage> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "disk usage is only available on unix",
    ))
}
