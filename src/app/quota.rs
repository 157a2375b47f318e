// Clip quota - Bounds successful output and numbers finished clips

use std::path::{Path, PathBuf};

use tokio::sync::{Mutex, Notify};

use crate::domain::errors::DomainError;
use crate::utils::move_file;

/// Output directory naming scheme
#[derive(Debug, Clone)]
pub struct OutputLayout {
    dir: PathBuf,
    extension: String,
}

impl OutputLayout {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `clip_<number>.<ext>`
    pub fn clip_path(&self, number: usize) -> PathBuf {
        self.dir.join(format!("clip_{}.{}", number, self.extension))
    }
}

#[derive(Debug, Default)]
struct QuotaState {
    produced: usize,
    in_flight: usize,
}

/// Shared cap on successful clips.
///
/// A worker reserves a slot before taking an item, so `produced + in_flight`
/// never exceeds `max_clips`. Failed items release their slot to the next
/// candidate. Numbers are assigned under the lock at finalization, so
/// outputs are `clip_1..clip_n` in completion order with no gaps.
pub struct ClipQuota {
    max_clips: usize,
    layout: OutputLayout,
    state: Mutex<QuotaState>,
    changed: Notify,
}

impl ClipQuota {
    pub fn new(max_clips: usize, layout: OutputLayout) -> Self {
        Self {
            max_clips,
            layout,
            state: Mutex::new(QuotaState::default()),
            changed: Notify::new(),
        }
    }

    /// Wait for a slot; `false` once the cap has been reached
    pub async fn reserve(&self) -> bool {
        loop {
            let changed = {
                let mut state = self.state.lock().await;
                if state.produced >= self.max_clips {
                    return false;
                }
                if state.produced + state.in_flight < self.max_clips {
                    state.in_flight += 1;
                    return true;
                }
                // Registered before the lock is released, so no wakeup is missed
                self.changed.notified()
            };
            changed.await;
        }
    }

    /// Give back a reserved slot without producing a clip
    pub async fn release(&self) {
        let mut state = self.state.lock().await;
        state.in_flight = state.in_flight.saturating_sub(1);
        self.changed.notify_waiters();
    }

    /// Move a finished artifact to the next output number, consuming the slot
    pub async fn finalize(&self, artifact: &Path) -> Result<PathBuf, DomainError> {
        let mut state = self.state.lock().await;
        let number = state.produced + 1;
        let destination = self.layout.clip_path(number);
        let moved = move_file(artifact, &destination).await;

        state.in_flight = state.in_flight.saturating_sub(1);
        if moved.is_ok() {
            state.produced = number;
        }
        self.changed.notify_waiters();

        moved.map(|_| destination).map_err(|e| {
            DomainError::Finalize(format!("Failed to move {}: {}", artifact.display(), e))
        })
    }

    pub async fn produced(&self) -> usize {
        self.state.lock().await.produced
    }

    pub fn max_clips(&self) -> usize {
        self.max_clips
    }
}
