//! File moves and best-effort cleanup

use std::io;
use std::path::Path;

use tokio::fs;
use tracing::{debug, warn};

/// Move a file, falling back to copy and delete across filesystems
pub async fn move_file(src: &Path, dst: &Path) -> io::Result<()> {
    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    match fs::rename(src, dst).await {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device_error(&e) => {
            debug!(
                "Cross-device rename, copying instead: {} -> {}",
                src.display(),
                dst.display()
            );
            copy_and_delete(src, dst).await
        }
        Err(e) => Err(e),
    }
}

/// ERROR_NOT_SAME_DEVICE
#[cfg(windows)]
const CROSS_DEVICE_OS_ERROR: i32 = 17;

/// EXDEV on Linux and macOS
#[cfg(not(windows))]
const CROSS_DEVICE_OS_ERROR: i32 = 18;

fn is_cross_device_error(e: &io::Error) -> bool {
    e.raw_os_error() == Some(CROSS_DEVICE_OS_ERROR)
}

async fn copy_and_delete(src: &Path, dst: &Path) -> io::Result<()> {
    let staging = dst.with_extension("part");

    if let Err(e) = fs::copy(src, &staging).await {
        remove_best_effort(&staging).await;
        return Err(e);
    }
    if let Err(e) = fs::rename(&staging, dst).await {
        remove_best_effort(&staging).await;
        return Err(e);
    }

    remove_best_effort(src).await;
    Ok(())
}

/// Delete a file if it exists; failures are logged and swallowed
pub async fn remove_best_effort(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => debug!("Removed {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove {}: {}", path.display(), e),
    }
}
