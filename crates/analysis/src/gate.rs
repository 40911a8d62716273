use std::sync::atomic::{AtomicBool, Ordering};

/// Mutual-exclusion gate shared by every analyzer of one kind.
///
/// The flag is process-wide per analyzer class: two instances of the same
/// class cannot run concurrently even on unrelated inputs. Acquisition hands
/// out an RAII guard, so the flag is released on every exit path.
#[derive(Debug)]
pub struct AnalysisGate {
    busy: &'static AtomicBool,
}

impl AnalysisGate {
    pub const fn new(busy: &'static AtomicBool) -> Self {
        Self { busy }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Try to mark the gate busy. Returns `None` while another analysis
    /// holds it.
    pub fn try_acquire(&self) -> Option<GateGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GateGuard { busy: self.busy })
    }
}

/// Clears the busy flag on drop.
#[derive(Debug)]
pub struct GateGuard {
    busy: &'static AtomicBool,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
