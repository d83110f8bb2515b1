//! Effective user check for `--require-root`.

use crate::error::{JanitorError, JanitorResult};

/// Fail with [`JanitorError::NotRoot`] unless running with euid 0.
pub fn ensure_root() -> JanitorResult<()> {
    if is_root() {
        Ok(())
    } else {
        Err(JanitorError::NotRoot)
    }
}

#[cfg(unix)]
pub fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
pub fn is_root() -> bool {
    false
}
