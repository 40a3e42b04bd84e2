//! Single-flight gate bounding in-flight refreshes to one.

use std::sync::atomic::{AtomicBool, Ordering};

/// Concurrency gate that admits at most one refresh at a time.
///
/// There is no queue: a caller refused entry must drop the request entirely
/// and wait for its next scheduled opportunity. This bounds outstanding
/// refresh requests to one regardless of how slow the network is.
#[derive(Debug, Default)]
pub struct SyncGate {
    busy: AtomicBool,
}

impl SyncGate {
    /// Create an idle gate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    /// Attempt to enter the gate.
    ///
    /// Returns a permit while the gate is idle, `None` while a refresh is
    /// already in flight. The permit releases the gate when dropped, so the
    /// release happens exactly once on every exit path.
    #[must_use]
    pub fn try_enter(&self) -> Option<RefreshPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshPermit { gate: self })
    }

    /// Whether a refresh currently holds the gate.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// RAII permit returned by [`SyncGate::try_enter`].
#[derive(Debug)]
pub struct RefreshPermit<'a> {
    gate: &'a SyncGate,
}

impl Drop for RefreshPermit<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_entry_is_refused_while_held() {
        let gate = SyncGate::new();
        let permit = gate.try_enter().expect("gate starts idle");
        assert!(gate.is_busy());
        assert!(gate.try_enter().is_none());
        drop(permit);
        assert!(!gate.is_busy());
        assert!(gate.try_enter().is_some());
    }

    #[test]
    fn permit_releases_on_early_return_paths() {
        fn guarded(gate: &SyncGate, fail: bool) -> Result<(), &'static str> {
            let _permit = gate.try_enter().ok_or("busy")?;
            if fail {
                return Err("boom");
            }
            Ok(())
        }

        let gate = SyncGate::new();

        assert!(guarded(&gate, true).is_err());
        assert!(!gate.is_busy(), "error path must release the gate");
        assert!(guarded(&gate, false).is_ok());
        assert!(!gate.is_busy());
    }
}
