//! Interrupt-safe tick counter.
//!
//! The periodic timer callback counts ticks; the main loop drains them
//! one at a time, so a late wake-up replays every missed tick instead of
//! folding them into one.
//!
//! ```text
//! ┌─────────────┐  signal()  ┌──────────────┐  take()  ┌─────────────┐
//! │ esp_timer   │───────────▶│ TICKS count  │─────────▶│  Main loop  │
//! │ callback    │            │ (atomic u32) │          │ (consumer)  │
//! └─────────────┘            └──────────────┘          └─────────────┘
//! ```
//!
//! Lifecycle:
//! 1. [`reset`] once, before the timer is armed.
//! 2. [`signal`] from the timer context, once per period.
//! 3. [`take`] from the main loop until it returns `false`; each `true`
//!    is exactly one tick to run.

use core::sync::atomic::{AtomicU32, Ordering};

static TICKS_PENDING: AtomicU32 = AtomicU32::new(0);

/// Drop any stale ticks. Call before arming the timer.
pub fn reset() {
    TICKS_PENDING.store(0, Ordering::Release);
}

/// Count one tick. Safe to call from ISR / timer-task context.
pub fn signal() {
    TICKS_PENDING.fetch_add(1, Ordering::Release);
}

/// Consume one pending tick. Returns `false` when none is left.
pub fn take() -> bool {
    TICKS_PENDING
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
        .is_ok()
}
