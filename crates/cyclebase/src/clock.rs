//! Raw cycle counters. Allows using cyclebase with custom tick sources.
//!
//! The [`HostCounter`] is the best counter for the build target: the time
//! stamp counter on `x86`/`x86_64`, and a nanosecond [`MonotonicCounter`]
//! everywhere else. If you want to drive calibration or burst logging from a
//! different source, implement [`CycleCounter`] for it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use crate::constants::NS_PER_SEC;

/// Trait representing a monotonic source of ticks.
pub trait CycleCounter {
    /// Returns the current raw tick value. Must not block.
    fn now(&self) -> u64;

    /// The tick rate of the counter if it is known without calibration.
    ///
    /// Returns `None` for counters whose rate depends on the host CPU, such as
    /// the time stamp counter.
    fn fixed_rate(&self) -> Option<u64> {
        None
    }
}

impl<C: CycleCounter + ?Sized> CycleCounter for &C {
    #[inline(always)]
    fn now(&self) -> u64 {
        (**self).now()
    }

    fn fixed_rate(&self) -> Option<u64> {
        (**self).fixed_rate()
    }
}

impl<C: CycleCounter + ?Sized> CycleCounter for Arc<C> {
    #[inline(always)]
    fn now(&self) -> u64 {
        (**self).now()
    }

    fn fixed_rate(&self) -> Option<u64> {
        (**self).fixed_rate()
    }
}

/// The x86 time stamp counter.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct Tsc;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
impl CycleCounter for Tsc {
    #[inline(always)]
    fn now(&self) -> u64 {
        rdtsc()
    }
}

#[cfg(target_arch = "x86_64")]
#[allow(unsafe_code, unused_unsafe)]
#[inline(always)]
fn rdtsc() -> u64 {
    // SAFETY: rdtsc has no preconditions, it only reads the time stamp counter.
    unsafe { core::arch::x86_64::_rdtsc() }
}

#[cfg(target_arch = "x86")]
#[allow(unsafe_code, unused_unsafe)]
#[inline(always)]
fn rdtsc() -> u64 {
    // SAFETY: rdtsc has no preconditions, it only reads the time stamp counter.
    unsafe { core::arch::x86::_rdtsc() }
}

/// Nanoseconds elapsed since the first use of any `MonotonicCounter` in the
/// process. Coarser than [`Tsc`] but available on every target.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicCounter;

impl MonotonicCounter {
    fn anchor() -> Instant {
        static ANCHOR: OnceLock<Instant> = OnceLock::new();
        *ANCHOR.get_or_init(Instant::now)
    }
}

impl CycleCounter for MonotonicCounter {
    #[inline]
    fn now(&self) -> u64 {
        let elapsed = Instant::now().saturating_duration_since(Self::anchor());
        u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)
    }

    fn fixed_rate(&self) -> Option<u64> {
        Some(NS_PER_SEC)
    }
}

/// A counter that only moves when told to. Useful for tests and simulation.
#[derive(Debug, Default)]
pub struct ManualCounter {
    ticks: AtomicU64,
}

impl ManualCounter {
    pub fn new(start: u64) -> Self {
        Self {
            ticks: AtomicU64::new(start),
        }
    }

    /// Moves the counter forward, saturating at `u64::MAX`.
    pub fn advance(&self, ticks: u64) {
        // fetch_update only fails if the closure returns None
        let _ = self
            .ticks
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |t| {
                Some(t.saturating_add(ticks))
            });
    }

    pub fn set(&self, ticks: u64) {
        self.ticks.store(ticks, Ordering::Relaxed);
    }
}

impl CycleCounter for ManualCounter {
    fn now(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}

/// The best counter for the build target.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub type HostCounter = Tsc;

/// The best counter for the build target.
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
pub type HostCounter = MonotonicCounter;

/// Reads the current raw tick count of the [`HostCounter`].
///
/// Lock-free and non-blocking, suitable for hot paths. Values are monotonic on
/// a single core.
#[inline(always)]
pub fn poll_clock() -> u64 {
    HostCounter::default().now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_clock_is_non_decreasing() {
        let a = poll_clock();
        let b = poll_clock();
        assert!(b >= a);
    }

    #[test]
    fn monotonic_counter_advances() {
        let c = MonotonicCounter;
        let a = c.now();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = c.now();
        assert!(b > a);
        assert_eq!(c.fixed_rate(), Some(NS_PER_SEC));
    }

    #[test]
    fn manual_counter() {
        let c = ManualCounter::new(10);
        assert_eq!(c.now(), 10);
        c.advance(5);
        assert_eq!(c.now(), 15);
        c.advance(u64::MAX);
        assert_eq!(c.now(), u64::MAX);
        c.set(3);
        assert_eq!(c.now(), 3);
        assert_eq!(c.fixed_rate(), None);

        // through references and Arc
        let r = &c;
        assert_eq!(r.now(), 3);
        let a = Arc::new(ManualCounter::new(7));
        assert_eq!(a.now(), 7);
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    #[test]
    fn tsc_moves() {
        let a = Tsc.now();
        std::thread::sleep(std::time::Duration::from_millis(1));
        assert!(Tsc.now() > a);
        assert_eq!(Tsc.fixed_rate(), None);
    }
}
