//! Lock guarding the logger's mutable state

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(test)]
use std::sync::atomic::AtomicUsize;

/// How the logger state is synchronized. Fixed when the logger is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockMode {
    /// Full mutual exclusion
    #[default]
    Mutex,
    /// The embedder asserts the logger is only used from one thread at a
    /// time. Each event takes the lock once instead of once per phase, and
    /// acquisition never waits. Each acquisition is still an atomic
    /// compare-and-swap; the mode saves the extra acquisitions and adds
    /// contention detection, not lock-free access. A contended acquisition
    /// breaks the assertion and is reported once before falling back to
    /// waiting.
    Unsynchronized,
}

pub(crate) struct StateLock<T> {
    mode: LockMode,
    inner: Mutex<T>,
    contention_reported: AtomicBool,
    #[cfg(test)]
    acquisitions: AtomicUsize,
}

impl<T> StateLock<T> {
    pub(crate) fn new(mode: LockMode, value: T) -> Self {
        Self {
            mode,
            inner: Mutex::new(value),
            contention_reported: AtomicBool::new(false),
            #[cfg(test)]
            acquisitions: AtomicUsize::new(0),
        }
    }

    pub(crate) fn mode(&self) -> LockMode {
        self.mode
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, T> {
        #[cfg(test)]
        self.acquisitions.fetch_add(1, Ordering::Relaxed);
        match self.mode {
            LockMode::Mutex => self.inner.lock(),
            LockMode::Unsynchronized => match self.inner.try_lock() {
                Some(guard) => guard,
                None => {
                    if !self.contention_reported.swap(true, Ordering::Relaxed) {
                        eprintln!(
                            "[LOGGER WARNING] Logger built with LockMode::Unsynchronized \
                             was used from several threads at once; waiting for the lock."
                        );
                    }
                    self.inner.lock()
                }
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn contention_reported(&self) -> bool {
        self.contention_reported.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub(crate) fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::Relaxed)
    }
}
