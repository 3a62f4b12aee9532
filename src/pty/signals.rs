//! Interrupt forwarding
//!
//! [`InterruptHandle`] lets another thread (or a Ctrl-C listener) send
//! `SIGINT` to whatever process group the executor is currently running,
//! without touching the executor itself.

use crate::platform::{GroupSignal, Platform, SignalOps};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;

struct Inner {
    /// Process group of the running command, 0 when idle
    active_pgid: AtomicI32,
    interrupted: AtomicBool,
    signals: Arc<dyn SignalOps>,
}

/// Cloneable, thread-safe handle for interrupting the running command
#[derive(Clone)]
pub struct InterruptHandle {
    inner: Arc<Inner>,
}

impl InterruptHandle {
    pub fn new(signals: Arc<dyn SignalOps>) -> Self {
        Self {
            inner: Arc::new(Inner {
                active_pgid: AtomicI32::new(0),
                interrupted: AtomicBool::new(false),
                signals,
            }),
        }
    }

    /// Send `SIGINT` to the running command's process group
    ///
    /// Returns whether a process group was signalled.
    pub fn interrupt(&self) -> bool {
        let pgid = self.inner.active_pgid.load(Ordering::Acquire);
        if pgid <= 0 {
            return false;
        }

        match self.inner.signals.signal_group(pgid, GroupSignal::Interrupt) {
            Ok(()) => {
                debug!("Sent SIGINT to process group {}", pgid);
                self.inner.interrupted.store(true, Ordering::Release);
                true
            }
            Err(e) => {
                debug!("Interrupt of process group {} failed: {}", pgid, e);
                false
            }
        }
    }

    /// Whether a command is currently running
    pub fn is_active(&self) -> bool {
        self.inner.active_pgid.load(Ordering::Acquire) > 0
    }

    /// Process group of the running command
    pub fn active_pgid(&self) -> Option<i32> {
        let pgid = self.inner.active_pgid.load(Ordering::Acquire);
        (pgid > 0).then_some(pgid)
    }

    pub(crate) fn arm(&self, pgid: i32) {
        self.inner.interrupted.store(false, Ordering::Release);
        self.inner.active_pgid.store(pgid, Ordering::Release);
    }

    /// Clear the active group; returns whether it was interrupted
    pub(crate) fn disarm(&self) -> bool {
        self.inner.active_pgid.store(0, Ordering::Release);
        self.inner.interrupted.swap(false, Ordering::AcqRel)
    }
}

impl Default for InterruptHandle {
    fn default() -> Self {
        Self::new(Arc::from(Platform::signals()))
    }
}

impl std::fmt::Debug for InterruptHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterruptHandle")
            .field("active_pgid", &self.active_pgid())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSignals {
        sent: Mutex<Vec<(i32, GroupSignal)>>,
    }

    impl SignalOps for RecordingSignals {
        fn signal_group(&self, pgid: i32, signal: GroupSignal) -> Result<()> {
            self.sent.lock().unwrap().push((pgid, signal));
            Ok(())
        }

        fn process_group_of(&self, pid: u32) -> Result<i32> {
            Ok(pid as i32)
        }

        fn is_group_alive(&self, _pgid: i32) -> bool {
            true
        }
    }

    #[test]
    fn test_idle_interrupt_returns_false() {
        let signals = Arc::new(RecordingSignals::default());
        let handle = InterruptHandle::new(signals.clone());
        assert!(!handle.interrupt());
        assert!(signals.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_interrupt_targets_active_group() {
        let signals = Arc::new(RecordingSignals::default());
        let handle = InterruptHandle::new(signals.clone());
        let remote = handle.clone();

        handle.arm(4242);
        assert!(remote.is_active());
        assert!(remote.interrupt());
        assert_eq!(
            *signals.sent.lock().unwrap(),
            vec![(4242, GroupSignal::Interrupt)]
        );

        assert!(handle.disarm());
        assert!(!remote.is_active());
        assert!(!remote.interrupt());
    }

    #[test]
    fn test_arm_clears_stale_interrupt() {
        let handle = InterruptHandle::new(Arc::new(RecordingSignals::default()));
        handle.arm(10);
        handle.interrupt();
        handle.arm(11);
        assert!(!handle.disarm());
    }
}
