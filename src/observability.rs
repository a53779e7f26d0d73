//! Transfer slot instrumentation

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Counters for transfer slot usage
///
/// Every acquired slot is wrapped in a [`SlotGuard`], so `active` always
/// equals acquisitions minus releases and never exceeds the pool size.
#[derive(Debug, Default)]
pub struct TransferMetrics {
    slots_acquired: AtomicU64,
    slots_released: AtomicU64,
    active: AtomicUsize,
    peak_active: AtomicUsize,
}

impl TransferMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a slot acquisition; the slot is released when the guard drops
    pub fn slot_acquired(self: &Arc<Self>) -> SlotGuard {
        self.slots_acquired.fetch_add(1, Ordering::Relaxed);
        let active = self.active.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak_active.fetch_max(active, Ordering::AcqRel);
        tracing::trace!(active, "Transfer slot acquired");

        SlotGuard {
            metrics: Arc::clone(self),
        }
    }

    fn slot_released(&self) {
        self.slots_released.fetch_add(1, Ordering::Relaxed);
        let active = self.active.fetch_sub(1, Ordering::AcqRel) - 1;
        tracing::trace!(active, "Transfer slot released");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            slots_acquired: self.slots_acquired.load(Ordering::Relaxed),
            slots_released: self.slots_released.load(Ordering::Relaxed),
            active: self.active.load(Ordering::Acquire),
            peak_active: self.peak_active.load(Ordering::Acquire),
        }
    }
}

/// Releases its slot on drop, on every exit path of a transfer
#[derive(Debug)]
pub struct SlotGuard {
    metrics: Arc<TransferMetrics>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.metrics.slot_released();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub slots_acquired: u64,
    pub slots_released: u64,
    pub active: usize,
    pub peak_active: usize,
}
