//! Monotonic uptime.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` for
//!   host-side testing and simulation.
//!
//! The scheduler consumes a `u32` millisecond timestamp and only ever
//! subtracts two of them with wrapping arithmetic, so the ~49.7 day
//! wraparound is harmless.

/// Uptime source for the driver loop.
pub struct Uptime {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Uptime {
    fn default() -> Self {
        Self::new()
    }
}

impl Uptime {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        // SAFETY: esp_timer_get_time reads a free-running counter.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since the adapter was created (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    /// Milliseconds since boot, truncated to 32 bits.
    pub fn uptime_ms(&self) -> u32 {
        self.ticks(1)
    }

    /// Whole `period_ms` periods since boot, truncated to 32 bits. This
    /// is the timestamp unit the scheduler expects.
    pub fn ticks(&self, period_ms: u32) -> u32 {
        (self.uptime_us() / (u64::from(period_ms.max(1)) * 1_000)) as u32
    }
}
